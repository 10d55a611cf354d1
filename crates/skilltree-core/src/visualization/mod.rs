//! Skill Visualization Module
//!
//! Text rendering of a skill hierarchy for terminal output. Geometric
//! layout for graphical renderers lives in [`crate::layout`].
//!
//! # Example
//!
//! ```ignore
//! use skilltree_core::visualization::{HierarchyTree, RenderOptions};
//!
//! let renderer = HierarchyTree::with_options("Developer", &skills, RenderOptions::ascii());
//! println!("{}", renderer.render_with_summary());
//! ```

mod tree;

pub use tree::{HierarchyTree, NodeStyle, RenderOptions, SkillTreeNode, TreeBuilder};
