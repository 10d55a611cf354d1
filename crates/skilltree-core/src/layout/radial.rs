//! Radial layout: center node, category ring, skill ring
//!
//! Categories are placed evenly on the inner ring in sorted key order. Each
//! category shows at most `max_skills_per_category` of its skills on the
//! outer ring, spread across an arc centred on the category's angle.
//! Everything is fixed geometry; overflow is truncated, never compacted.

use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::PI;

use tracing::debug;

use super::types::{Connection, LayoutConfig, LayoutNode, NodeRef, RadialLayout};
use crate::skills::DetectedSkill;
use crate::taxonomy::Category;

pub const CENTER_ID: &str = "center";

/// Computes [`RadialLayout`]s from ordered skill lists
#[derive(Debug, Clone, Default)]
pub struct RadialLayoutEngine {
    config: LayoutConfig,
}

impl RadialLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `skills` around a center node labelled `center_label`
    ///
    /// Skills in the meta category are not placed on the rings. Input order
    /// decides which skills of a category are shown.
    pub fn layout(&self, skills: &[DetectedSkill], center_label: &str) -> RadialLayout {
        let config = &self.config;
        let center = config.center();

        let mut nodes = vec![LayoutNode::centered(
            CENTER_ID.to_string(),
            NodeRef::Center {
                label: center_label.to_string(),
            },
            center,
            config.center_size,
            0.0,
        )];
        let mut connections = Vec::new();

        let groups = group_by_category(skills, config.max_skills_per_category);
        let angles = category_angles(groups.len());
        let step = angle_step(groups.len());

        for ((category, members), angle) in groups.iter().zip(angles) {
            let category_id = category_node_id(*category);
            let category_node = LayoutNode::centered(
                category_id.clone(),
                NodeRef::Category {
                    category: *category,
                    label: category.display_name().to_string(),
                },
                center.polar(config.category_radius, angle),
                config.category_size,
                angle,
            );
            connections.push(connect(&nodes[0], &category_node));

            let skill_angles = arc_angles(angle, step * config.arc_fraction, members.len());
            let mut skill_nodes = Vec::with_capacity(members.len());
            for (skill, skill_angle) in members.iter().zip(skill_angles) {
                let node = LayoutNode::centered(
                    skill_node_id(*category, &skill.key),
                    NodeRef::Skill((*skill).clone()),
                    center.polar(config.skill_radius(), skill_angle),
                    config.skill_size,
                    skill_angle,
                );
                connections.push(connect(&category_node, &node));
                skill_nodes.push(node);
            }

            nodes.push(category_node);
            nodes.extend(skill_nodes);
        }

        let bottom = nodes.iter().map(LayoutNode::bottom).fold(f64::MIN, f64::max);
        let height = (bottom + config.bottom_padding).max(config.min_height);

        debug!(
            categories = groups.len(),
            nodes = nodes.len(),
            connections = connections.len(),
            height,
            "Radial layout computed"
        );

        RadialLayout {
            width: config.width,
            height,
            nodes,
            connections,
        }
    }
}

/// Lay out with the default geometry
pub fn radial_layout(skills: &[DetectedSkill], center_label: &str) -> RadialLayout {
    RadialLayoutEngine::default().layout(skills, center_label)
}

/// Angular distance between neighbouring categories
pub fn angle_step(count: usize) -> f64 {
    if count == 0 { 0.0 } else { 2.0 * PI / count as f64 }
}

/// Angles of `count` categories on the inner ring
///
/// Odd counts start at the top (`-π/2`); even counts are rotated by half a
/// step so no category sits directly above the center.
pub fn category_angles(count: usize) -> Vec<f64> {
    let step = angle_step(count);
    let start = if count % 2 == 0 { -PI / 2.0 + step / 2.0 } else { -PI / 2.0 };
    (0..count).map(|i| start + step * i as f64).collect()
}

/// `count` angles spread end to end over an arc of width `span` centred on `mid`
pub fn arc_angles(mid: f64, span: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![mid],
        _ => {
            let first = mid - span / 2.0;
            let last_index = (count - 1) as f64;
            (0..count).map(|i| first + span * i as f64 / last_index).collect()
        }
    }
}

// Sorted by category key; meta dropped; members unique by name, input order kept.
fn group_by_category(skills: &[DetectedSkill], limit: usize) -> Vec<(Category, Vec<&DetectedSkill>)> {
    let mut groups: BTreeMap<&'static str, (Category, Vec<&DetectedSkill>)> = BTreeMap::new();
    let mut seen: BTreeSet<(Category, &str)> = BTreeSet::new();

    for skill in skills {
        if skill.category == Category::Meta {
            continue;
        }
        let (_, members) = groups
            .entry(skill.category.as_str())
            .or_insert_with(|| (skill.category, Vec::new()));
        if !seen.insert((skill.category, skill.name.as_str())) {
            continue;
        }
        if members.len() < limit {
            members.push(skill);
        }
    }

    groups.into_values().collect()
}

fn category_node_id(category: Category) -> String {
    format!("category:{}", category.as_str())
}

fn skill_node_id(category: Category, key: &str) -> String {
    format!("skill:{}:{}", category.as_str(), key)
}

fn connect(from: &LayoutNode, to: &LayoutNode) -> Connection {
    Connection {
        from: from.id.clone(),
        to: to.id.clone(),
        from_point: from.center_point,
        to_point: to.center_point,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NodeKind;
    use crate::taxonomy::TaxonomyEntry;

    const EPS: f64 = 1e-9;

    fn skill(key: &str, name: &str, category: Category, level: u8) -> DetectedSkill {
        DetectedSkill::from_entry(&TaxonomyEntry::new(key, name, category), level)
    }

    fn sample() -> Vec<DetectedSkill> {
        vec![
            skill("javascript", "JavaScript", Category::Language, 5),
            skill("python", "Python", Category::Language, 3),
            skill("react", "React", Category::Framework, 4),
            skill("postgres", "PostgreSQL", Category::Database, 2),
            skill("docker", "Docker", Category::Devops, 2),
        ]
    }

    fn normalize(angle: f64) -> f64 {
        angle.rem_euclid(2.0 * PI)
    }

    #[test]
    fn test_empty_input_yields_center_only() {
        let layout = radial_layout(&[], "Developer");
        assert_eq!(layout.nodes.len(), 1);
        assert!(layout.connections.is_empty());
        assert_eq!(layout.nodes[0].kind, NodeKind::Center);
        assert_eq!(layout.nodes[0].label(), "Developer");
        assert_eq!(layout.height, LayoutConfig::default().min_height);
    }

    #[test]
    fn test_odd_ring_starts_at_top() {
        let angles = category_angles(3);
        assert!((angles[0] + PI / 2.0).abs() < EPS);
        assert!((angles[1] - angles[0] - 2.0 * PI / 3.0).abs() < EPS);
    }

    #[test]
    fn test_even_ring_avoids_top() {
        for count in [2, 4, 6, 8] {
            let step = angle_step(count);
            let angles = category_angles(count);
            for pair in angles.windows(2) {
                assert!((pair[1] - pair[0] - step).abs() < EPS);
            }
            for angle in &angles {
                assert!((normalize(*angle) - normalize(-PI / 2.0)).abs() > 1e-6);
            }
        }
    }

    #[test]
    fn test_arc_angles() {
        assert!(arc_angles(1.0, 0.5, 0).is_empty());
        assert_eq!(arc_angles(1.0, 0.5, 1), vec![1.0]);

        let three = arc_angles(1.0, 0.5, 3);
        assert!((three[0] - 0.75).abs() < EPS);
        assert!((three[1] - 1.0).abs() < EPS);
        assert!((three[2] - 1.25).abs() < EPS);
    }

    #[test]
    fn test_categories_sorted_by_key() {
        let layout = radial_layout(&sample(), "Dev");
        let ids: Vec<_> = layout.nodes_of_kind(NodeKind::Category).map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["category:database", "category:devops", "category:framework", "category:language"]
        );
    }

    #[test]
    fn test_category_ring_symmetry() {
        let layout = radial_layout(&sample(), "Dev");
        let config = LayoutConfig::default();
        let center = config.center();
        let categories: Vec<_> = layout.nodes_of_kind(NodeKind::Category).collect();
        assert_eq!(categories.len(), 4);

        for node in &categories {
            assert!((node.center_point.distance_to(center) - config.category_radius).abs() < 1e-6);
        }
        for pair in categories.windows(2) {
            assert!((pair[1].angle - pair[0].angle - PI / 2.0).abs() < EPS);
        }
    }

    #[test]
    fn test_single_skill_sits_on_category_angle() {
        let layout = radial_layout(&sample(), "Dev");
        let category = layout.node("category:framework").unwrap();
        let react = layout.node("skill:framework:react").unwrap();
        assert!((react.angle - category.angle).abs() < EPS);

        let config = LayoutConfig::default();
        assert!((react.center_point.distance_to(config.center()) - config.skill_radius()).abs() < 1e-6);
    }

    #[test]
    fn test_truncates_to_three_skills() {
        let skills: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|k| skill(k, &k.to_uppercase(), Category::Tools, 3))
            .collect();

        let layout = radial_layout(&skills, "Dev");
        let shown: Vec<_> = layout.nodes_of_kind(NodeKind::Skill).map(|n| n.label()).collect();
        assert_eq!(shown, vec!["A", "B", "C"]);

        let category = layout.node("category:tools").unwrap();
        let arc = angle_step(1) * 0.7;
        let first = layout.node("skill:tools:a").unwrap();
        let last = layout.node("skill:tools:c").unwrap();
        assert!((first.angle - (category.angle - arc / 2.0)).abs() < EPS);
        assert!((last.angle - (category.angle + arc / 2.0)).abs() < EPS);
    }

    #[test]
    fn test_duplicate_names_placed_once() {
        let skills = vec![
            skill("react", "React", Category::Framework, 4),
            skill("react-js", "React", Category::Framework, 2),
        ];
        let layout = radial_layout(&skills, "Dev");
        assert_eq!(layout.nodes_of_kind(NodeKind::Skill).count(), 1);
    }

    #[test]
    fn test_meta_is_not_placed() {
        let skills = vec![
            skill("profile", "Profile", Category::Meta, 1),
            skill("rust", "Rust", Category::Language, 5),
        ];
        let layout = radial_layout(&skills, "Dev");
        assert_eq!(layout.nodes.len(), 3);
        assert!(layout.node("category:meta").is_none());
    }

    #[test]
    fn test_connectivity() {
        let layout = radial_layout(&sample(), "Dev");

        for node in layout.nodes.iter().filter(|n| n.kind != NodeKind::Center) {
            assert_eq!(layout.inbound(&node.id).count(), 1, "node {}", node.id);
        }
        assert_eq!(layout.inbound(CENTER_ID).count(), 0);

        for connection in &layout.connections {
            let from = layout.node(&connection.from).unwrap();
            let to = layout.node(&connection.to).unwrap();
            assert_eq!(connection.from_point, from.center_point);
            assert_eq!(connection.to_point, to.center_point);
            match to.kind {
                NodeKind::Category => assert_eq!(from.kind, NodeKind::Center),
                NodeKind::Skill => assert_eq!(from.kind, NodeKind::Category),
                NodeKind::Center => unreachable!(),
            }
        }
    }

    #[test]
    fn test_layout_parent_is_category_not_taxonomy_parent() {
        let redux = skill("redux", "Redux", Category::Framework, 3).with_parent(Some("React".into()));
        let skills = vec![skill("react", "React", Category::Framework, 4), redux];

        let layout = radial_layout(&skills, "Dev");
        let inbound: Vec<_> = layout.inbound("skill:framework:redux").collect();
        assert_eq!(inbound[0].from, "category:framework");
    }

    #[test]
    fn test_height_follows_lowest_node() {
        let config = LayoutConfig {
            min_height: 10.0,
            ..LayoutConfig::default()
        };
        let layout = RadialLayoutEngine::new(config.clone()).layout(&sample(), "Dev");
        let bottom = layout.nodes.iter().map(LayoutNode::bottom).fold(f64::MIN, f64::max);
        assert!((layout.height - (bottom + config.bottom_padding)).abs() < EPS);
        assert_eq!(layout.width, config.width);
    }

    #[test]
    fn test_deterministic() {
        let first = serde_json::to_string(&radial_layout(&sample(), "Dev")).unwrap();
        let second = serde_json::to_string(&radial_layout(&sample(), "Dev")).unwrap();
        assert_eq!(first, second);
    }
}
