//! Detected skill types

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Category, TaxonomyEntry};

/// Highest proficiency level a skill can reach
pub const MAX_LEVEL: u8 = 5;

/// A taxonomy entry confirmed present in a user's signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSkill {
    /// Display name; unique within a profile
    pub name: String,
    /// Key of the taxonomy entry this skill came from
    pub key: String,
    pub category: Category,
    /// Proficiency level, 1..=5 once detected
    pub level: u8,
    /// Display name of the taxonomy parent, if it resolves
    pub parent_name: Option<String>,
    /// Depth in the taxonomy forest (root = 0)
    pub tree_depth: usize,
    /// Repositories that mention this skill
    pub repo_count: usize,
    /// Synthesized to complete an ancestor chain rather than matched
    pub inferred: bool,
    /// Weight of the originating taxonomy entry
    pub source_weight: f64,
    /// Share of language bytes in percent, for language detections
    pub share: Option<f64>,
}

impl DetectedSkill {
    /// Create a detected skill from a taxonomy entry
    pub fn from_entry(entry: &TaxonomyEntry, level: u8) -> Self {
        Self {
            name: entry.display_name.clone(),
            key: entry.key.clone(),
            category: entry.category,
            level: level.min(MAX_LEVEL),
            parent_name: None,
            tree_depth: 0,
            repo_count: 0,
            inferred: false,
            source_weight: entry.weight,
            share: None,
        }
    }

    /// Synthesize an ancestor for a child detected at `child_level`
    pub fn inferred_from(entry: &TaxonomyEntry, child_level: u8) -> Self {
        Self {
            inferred: true,
            ..Self::from_entry(entry, child_level.saturating_sub(1).max(1))
        }
    }

    pub fn with_parent(mut self, parent_name: Option<String>) -> Self {
        self.parent_name = parent_name;
        self
    }

    pub fn with_repo_count(mut self, repo_count: usize) -> Self {
        self.repo_count = repo_count;
        self
    }

    pub fn with_share(mut self, share: f64) -> Self {
        self.share = Some(share);
        self
    }

    /// Level as a fixed-width bar, e.g. `■■■□□`
    pub fn level_bar(&self, filled: char, empty: char) -> String {
        let level = usize::from(self.level.min(MAX_LEVEL));
        std::iter::repeat_n(filled, level)
            .chain(std::iter::repeat_n(empty, usize::from(MAX_LEVEL) - level))
            .collect()
    }
}
