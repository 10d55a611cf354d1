//! Tree visualization for skill hierarchies
//!
//! This module provides:
//! - SkillTreeNode: A tree representation of skills and their taxonomy children
//! - TreeBuilder: Constructs trees from an ordered skill list
//! - HierarchyTree: Renders trees as formatted text for CLI display

use std::collections::{BTreeSet, HashMap};

use crate::skills::DetectedSkill;

/// Style configuration for tree rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStyle {
    /// ASCII characters only (works everywhere)
    Ascii,
    /// Unicode box-drawing characters
    #[default]
    Unicode,
    /// Rounded Unicode style
    Rounded,
}

impl NodeStyle {
    /// Branch and continuation strings for a child line
    fn branches(&self, is_last: bool) -> (&'static str, &'static str) {
        match (self, is_last) {
            (Self::Ascii, true) => ("`-- ", "    "),
            (Self::Ascii, false) => ("+-- ", "|   "),
            (Self::Unicode, true) => ("└── ", "    "),
            (Self::Rounded, true) => ("╰── ", "    "),
            (Self::Unicode | Self::Rounded, false) => ("├── ", "│   "),
        }
    }

    /// Filled and empty cells of a level bar
    pub fn level_chars(&self) -> (char, char) {
        match self {
            Self::Ascii => ('#', '-'),
            Self::Unicode => ('■', '□'),
            Self::Rounded => ('●', '○'),
        }
    }
}

/// Options for rendering the tree
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Visual style for tree characters
    pub style: NodeStyle,
    /// Show level bars
    pub show_levels: bool,
    /// Show each skill's category
    pub show_categories: bool,
    /// Mark skills synthesized from a child
    pub show_inferred: bool,
    /// Maximum depth to render (-1 for unlimited)
    pub max_depth: i32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: NodeStyle::Unicode,
            show_levels: true,
            show_categories: false,
            show_inferred: true,
            max_depth: -1,
        }
    }
}

impl RenderOptions {
    /// Create ASCII-only options for basic terminals
    pub fn ascii() -> Self {
        Self {
            style: NodeStyle::Ascii,
            ..Default::default()
        }
    }

    /// Names only
    pub fn minimal() -> Self {
        Self {
            show_levels: false,
            show_categories: false,
            show_inferred: false,
            ..Default::default()
        }
    }

    /// Builder: set style
    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder: set max depth
    pub fn with_max_depth(mut self, depth: i32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builder: show or hide level bars
    pub fn with_levels(mut self, show: bool) -> Self {
        self.show_levels = show;
        self
    }

    /// Builder: show or hide categories
    pub fn with_categories(mut self, show: bool) -> Self {
        self.show_categories = show;
        self
    }
}

/// A skill and the skills whose taxonomy parent it is
#[derive(Debug, Clone)]
pub struct SkillTreeNode {
    pub skill: DetectedSkill,
    pub children: Vec<SkillTreeNode>,
}

impl SkillTreeNode {
    pub fn new(skill: DetectedSkill) -> Self {
        Self {
            skill,
            children: Vec::new(),
        }
    }

    /// Count total nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(|c| c.count()).sum::<usize>()
    }

    /// Count inferred nodes in this subtree
    pub fn count_inferred(&self) -> usize {
        usize::from(self.skill.inferred) + self.children.iter().map(|c| c.count_inferred()).sum::<usize>()
    }

    /// Find a node by skill name (recursive)
    pub fn find(&self, name: &str) -> Option<&SkillTreeNode> {
        if self.skill.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Builds skill forests from ordered skill lists
pub struct TreeBuilder;

impl TreeBuilder {
    /// Group skills under their taxonomy parents
    ///
    /// Skills whose parent is absent from the list become roots. Sibling
    /// order follows input order.
    pub fn from_skills(skills: &[DetectedSkill]) -> Vec<SkillTreeNode> {
        let names: BTreeSet<&str> = skills.iter().map(|s| s.name.as_str()).collect();

        let mut children: HashMap<&str, Vec<&DetectedSkill>> = HashMap::new();
        let mut roots = Vec::new();
        for skill in skills {
            match skill.parent_name.as_deref() {
                Some(parent) if parent != skill.name && names.contains(parent) => {
                    children.entry(parent).or_default().push(skill);
                }
                _ => roots.push(skill),
            }
        }

        let mut placed = BTreeSet::new();
        roots
            .into_iter()
            .filter_map(|skill| Self::attach(skill, &children, &mut placed))
            .collect()
    }

    fn attach<'a>(
        skill: &'a DetectedSkill,
        children: &HashMap<&str, Vec<&'a DetectedSkill>>,
        placed: &mut BTreeSet<&'a str>,
    ) -> Option<SkillTreeNode> {
        if !placed.insert(skill.name.as_str()) {
            return None;
        }

        let mut node = SkillTreeNode::new(skill.clone());
        if let Some(kids) = children.get(skill.name.as_str()) {
            node.children = kids
                .iter()
                .filter_map(|kid| Self::attach(*kid, children, placed))
                .collect();
        }
        Some(node)
    }
}

/// Text renderer for a skill forest below a single labelled root
#[derive(Debug, Clone)]
pub struct HierarchyTree {
    label: String,
    roots: Vec<SkillTreeNode>,
    options: RenderOptions,
}

impl HierarchyTree {
    /// Create a renderer for an ordered skill list
    pub fn new(label: impl Into<String>, skills: &[DetectedSkill]) -> Self {
        Self::with_options(label, skills, RenderOptions::default())
    }

    /// Create with custom render options
    pub fn with_options(label: impl Into<String>, skills: &[DetectedSkill], options: RenderOptions) -> Self {
        Self {
            label: label.into(),
            roots: TreeBuilder::from_skills(skills),
            options,
        }
    }

    pub fn roots(&self) -> &[SkillTreeNode] {
        &self.roots
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render the tree to a string
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.label);
        output.push('\n');

        let count = self.roots.len();
        for (i, root) in self.roots.iter().enumerate() {
            self.render_node(root, &mut output, "", i == count - 1, 1);
        }
        output
    }

    /// Render with a summary header
    pub fn render_with_summary(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.render_header());
        output.push('\n');
        output.push_str(&self.render());
        output
    }

    fn render_header(&self) -> String {
        let total: usize = self.roots.iter().map(|r| r.count()).sum();
        let inferred: usize = self.roots.iter().map(|r| r.count_inferred()).sum();
        format!("Skill Profile ({} skills, {} inferred)", total, inferred)
    }

    fn render_node(&self, node: &SkillTreeNode, output: &mut String, prefix: &str, is_last: bool, depth: usize) {
        if self.options.max_depth >= 0 && depth as i32 > self.options.max_depth {
            return;
        }

        let (branch, vertical) = self.options.style.branches(is_last);
        let skill = &node.skill;

        let mut line = String::new();
        line.push_str(prefix);
        line.push_str(branch);
        line.push_str(&skill.name);

        if self.options.show_levels {
            let (filled, empty) = self.options.style.level_chars();
            line.push_str(&format!(" [{}]", skill.level_bar(filled, empty)));
        }

        if self.options.show_categories {
            line.push_str(&format!(" ({})", skill.category.as_str()));
        }

        if self.options.show_inferred && skill.inferred {
            line.push_str(" (inferred)");
        }

        output.push_str(&line);
        output.push('\n');

        let child_prefix = format!("{}{}", prefix, vertical);
        let count = node.children.len();
        for (i, child) in node.children.iter().enumerate() {
            self.render_node(child, output, &child_prefix, i == count - 1, depth + 1);
        }
    }

    /// Render a compact single-line summary
    pub fn render_compact(&self) -> String {
        let total: usize = self.roots.iter().map(|r| r.count()).sum();
        let inferred: usize = self.roots.iter().map(|r| r.count_inferred()).sum();
        format!("[{} skills] Roots:{} Inferred:{}", total, self.roots.len(), inferred)
    }
}

impl std::fmt::Display for HierarchyTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
