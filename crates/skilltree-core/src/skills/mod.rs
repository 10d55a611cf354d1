//! Skill inference - matching and hierarchy building
//!
//! # Architecture
//!
//! - **DetectedSkill**: a taxonomy entry confirmed in a user's signal
//! - **SkillMatcher**: scores taxonomy entries against a [`RepoSignal`](crate::signal::RepoSignal)
//! - **HierarchyBuilder**: back-fills missing ancestors and orders the result
//!
//! # Example
//!
//! ```rust,ignore
//! use skilltree_core::skills::{build_hierarchy, detect_skills};
//!
//! let detected = detect_skills(&signal, &catalog);
//! let skills = build_hierarchy(detected, &catalog)?;
//! ```

mod hierarchy;
mod matcher;
mod types;

pub use hierarchy::{HierarchyBuilder, build_hierarchy};
pub use matcher::{
    SkillMatcher, SubstringMatcher, TextMatcher, detect_skills, keyword_level, language_level,
};
pub use types::{DetectedSkill, MAX_LEVEL};
