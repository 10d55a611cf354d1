//! Skilltree Core Library
//!
//! This crate infers a developer's technology skill profile from repository
//! signals and lays it out as a radial diagram:
//! - Taxonomy (multi-source catalog, normalization, cached store)
//! - Signal aggregation (language bytes and repository text)
//! - Skill matching and hierarchy building with ancestor back-fill
//! - Radial layout (center, category ring, skill ring)
//! - Text tree rendering
//! - Configuration

pub mod config;
pub mod error;
pub mod layout;
pub mod profile;
pub mod signal;
pub mod skills;
pub mod taxonomy;
pub mod visualization;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::layout::{LayoutConfig, RadialLayout, RadialLayoutEngine};
    pub use crate::profile::{SkillProfile, SkillProfiler};
    pub use crate::signal::{RepoRecord, RepoSignal};
    pub use crate::skills::DetectedSkill;
    pub use crate::taxonomy::{Category, TaxonomyCatalog, TaxonomyEntry, TaxonomyStore};
}

#[cfg(test)]
mod config_tests;
