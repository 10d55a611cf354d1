//! Hierarchy building: ancestor back-fill and ordering
//!
//! Detected skills reference their taxonomy parent by name. When that
//! parent was not itself detected, the chain is walked upward and every
//! missing ancestor is synthesized as an inferred, lower-confidence skill.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::types::DetectedSkill;
use crate::error::Result;
use crate::taxonomy::{ParentLink, TaxonomyCatalog};

/// Builds the ordered skill hierarchy from detected skills
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Back-fill ancestors and order the result
    ///
    /// The output is sorted by taxonomy depth (roots first), then by
    /// descending level, then by name. Fails with
    /// [`Error::TaxonomyCycle`](crate::Error::TaxonomyCycle) when a parent
    /// chain loops.
    pub fn build(
        &self,
        detected: BTreeMap<String, DetectedSkill>,
        catalog: &TaxonomyCatalog,
    ) -> Result<Vec<DetectedSkill>> {
        let mut skills = detected;
        let names: Vec<String> = skills.keys().cloned().collect();

        for name in names {
            let (key, level) = match skills.get(&name) {
                Some(skill) => match &skill.parent_name {
                    Some(parent) if skills.get(parent).is_none_or(|p| p.inferred) => {
                        (skill.key.clone(), skill.level)
                    }
                    _ => continue,
                },
                None => continue,
            };

            if catalog.get(&key).is_none() {
                warn!(skill = %name, key = %key, "Detected skill has no taxonomy entry");
                continue;
            }

            let mut child_level = level;
            for ancestor in catalog.ancestors(&key)? {
                let candidate = DetectedSkill::inferred_from(ancestor, child_level);

                if let Some(existing) = skills.get_mut(&ancestor.display_name) {
                    // Detected ancestors keep their own level; inferred ones
                    // follow their most confident descendant.
                    if !existing.inferred || existing.level >= candidate.level {
                        break;
                    }
                    debug!(
                        skill = %existing.name,
                        from = existing.level,
                        to = candidate.level,
                        child = %name,
                        "Raised inferred ancestor"
                    );
                    existing.level = candidate.level;
                    child_level = candidate.level;
                    continue;
                }

                let parent_name = match catalog.parent_of(ancestor) {
                    ParentLink::Found(parent) => Some(parent.display_name.clone()),
                    ParentLink::Root | ParentLink::Missing(_) => None,
                };
                let inferred = candidate.with_parent(parent_name);
                child_level = inferred.level;

                debug!(
                    skill = %inferred.name,
                    level = inferred.level,
                    child = %name,
                    "Inferred missing ancestor"
                );
                skills.insert(inferred.name.clone(), inferred);
            }
        }

        let mut ordered: Vec<DetectedSkill> = Vec::with_capacity(skills.len());
        for mut skill in skills.into_values() {
            skill.tree_depth = match catalog.get(&skill.key) {
                Some(_) => catalog.depth_of(&skill.key)?,
                None => 0,
            };
            ordered.push(skill);
        }

        ordered.sort_by(|a, b| {
            a.tree_depth
                .cmp(&b.tree_depth)
                .then_with(|| b.level.cmp(&a.level))
                .then_with(|| a.name.cmp(&b.name))
        });

        debug!(
            skills = ordered.len(),
            inferred = ordered.iter().filter(|s| s.inferred).count(),
            "Skill hierarchy built"
        );
        Ok(ordered)
    }
}

/// Build the hierarchy with the default builder
pub fn build_hierarchy(
    detected: BTreeMap<String, DetectedSkill>,
    catalog: &TaxonomyCatalog,
) -> Result<Vec<DetectedSkill>> {
    HierarchyBuilder::new().build(detected, catalog)
}
