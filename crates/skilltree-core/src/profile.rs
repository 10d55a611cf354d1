//! End-to-end profile pipeline: match, build hierarchy, lay out

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::layout::{LayoutConfig, RadialLayout, RadialLayoutEngine};
use crate::signal::RepoSignal;
use crate::skills::{DetectedSkill, HierarchyBuilder, SkillMatcher, SubstringMatcher, TextMatcher};
use crate::taxonomy::{Category, TaxonomyCatalog, TaxonomyStore};
use crate::visualization::{HierarchyTree, RenderOptions};

/// Ordered skills plus their radial layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub center_label: String,
    pub skills: Vec<DetectedSkill>,
    pub layout: RadialLayout,
}

impl SkillProfile {
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn skill(&self, name: &str) -> Option<&DetectedSkill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn inferred_count(&self) -> usize {
        self.skills.iter().filter(|s| s.inferred).count()
    }

    /// Skills grouped by category, each group in profile order
    pub fn by_category(&self) -> BTreeMap<Category, Vec<&DetectedSkill>> {
        let mut groups: BTreeMap<Category, Vec<&DetectedSkill>> = BTreeMap::new();
        for skill in &self.skills {
            groups.entry(skill.category).or_default().push(skill);
        }
        groups
    }

    /// Text tree of the skill hierarchy
    pub fn tree(&self, options: RenderOptions) -> HierarchyTree {
        HierarchyTree::with_options(self.center_label.clone(), &self.skills, options)
    }
}

/// Runs the inference pipeline
#[derive(Debug, Clone)]
pub struct SkillProfiler<M: TextMatcher = SubstringMatcher> {
    matcher: SkillMatcher<M>,
    hierarchy: HierarchyBuilder,
    layout: RadialLayoutEngine,
    center_label: String,
}

impl Default for SkillProfiler<SubstringMatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillProfiler<SubstringMatcher> {
    pub fn new() -> Self {
        let config = Config::default();
        Self::with_matcher(SkillMatcher::new(), config.layout, config.profile.center_label)
    }

    /// Profiler using the configured layout geometry and center label
    pub fn from_config(config: &Config) -> Self {
        Self::with_matcher(
            SkillMatcher::new(),
            config.layout.clone(),
            config.profile.center_label.clone(),
        )
    }
}

impl<M: TextMatcher> SkillProfiler<M> {
    pub fn with_matcher(matcher: SkillMatcher<M>, layout: LayoutConfig, center_label: impl Into<String>) -> Self {
        Self {
            matcher,
            hierarchy: HierarchyBuilder::new(),
            layout: RadialLayoutEngine::new(layout),
            center_label: center_label.into(),
        }
    }

    pub fn with_center_label(mut self, label: impl Into<String>) -> Self {
        self.center_label = label.into();
        self
    }

    pub fn center_label(&self) -> &str {
        &self.center_label
    }

    /// Infer the profile for `signal` against `catalog`
    ///
    /// An empty signal yields an empty skill list and a center-only layout.
    pub fn profile(&self, signal: &RepoSignal, catalog: &TaxonomyCatalog) -> Result<SkillProfile> {
        let detected = self.matcher.detect(signal, catalog);
        let detected_count = detected.len();
        let skills = self.hierarchy.build(detected, catalog)?;
        let layout = self.layout.layout(&skills, &self.center_label);

        info!(
            repos = signal.repo_count(),
            detected = detected_count,
            skills = skills.len(),
            nodes = layout.nodes.len(),
            "Skill profile inferred"
        );

        Ok(SkillProfile {
            center_label: self.center_label.clone(),
            skills,
            layout,
        })
    }

    /// Load `sources` through `store`, then infer the profile
    pub async fn profile_from_store<S: AsRef<str>>(
        &self,
        store: &TaxonomyStore,
        sources: &[S],
        signal: &RepoSignal,
    ) -> Result<SkillProfile> {
        let catalog = store.catalog(sources).await?;
        self.profile(signal, &catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::layout::NodeKind;
    use crate::signal::RepoRecord;
    use crate::taxonomy::{InMemoryTaxonomyLoader, TaxonomyEntry, TaxonomySource};

    fn catalog() -> TaxonomyCatalog {
        let source = TaxonomySource::new(
            "web",
            vec![
                TaxonomyEntry::new("javascript", "JavaScript", Category::Language),
                TaxonomyEntry::new("python", "Python", Category::Language),
                TaxonomyEntry::new("react", "React", Category::Framework)
                    .with_parent("javascript")
                    .with_keywords(["react"]),
                TaxonomyEntry::new("redux", "Redux", Category::Framework)
                    .with_parent("react")
                    .with_keywords(["redux"]),
            ],
        );
        TaxonomyCatalog::from_sources([&source])
    }

    fn signal() -> RepoSignal {
        RepoSignal::from_repos(&[
            RepoRecord::new("web-app")
                .with_description("react redux project")
                .with_bytes("JavaScript", 900),
            RepoRecord::new("scripts").with_bytes("Python", 100),
        ])
    }

    #[test]
    fn test_profile_pipeline() {
        let profile = SkillProfiler::new().profile(&signal(), &catalog()).unwrap();

        assert_eq!(profile.skill("JavaScript").unwrap().level, 5);
        assert_eq!(profile.skill("Python").unwrap().level, 3);
        assert!(profile.skill("React").is_some());
        assert!(!profile.skill("Redux").unwrap().inferred);
        assert_eq!(profile.inferred_count(), 0);

        assert_eq!(profile.layout.nodes_of_kind(NodeKind::Category).count(), 2);
        assert_eq!(profile.layout.nodes_of_kind(NodeKind::Skill).count(), 4);
        assert_eq!(profile.by_category()[&Category::Framework].len(), 2);
    }

    #[test]
    fn test_empty_signal_profile() {
        let profile = SkillProfiler::new()
            .with_center_label("Nobody")
            .profile(&RepoSignal::default(), &catalog())
            .unwrap();

        assert!(profile.is_empty());
        assert_eq!(profile.layout.nodes.len(), 1);
        assert_eq!(profile.layout.nodes[0].label(), "Nobody");
        assert!(profile.layout.connections.is_empty());
        assert_eq!(profile.tree(RenderOptions::default()).render(), "Nobody\n");
    }

    #[test]
    fn test_from_config_uses_layout_settings() {
        let mut config = Config::default();
        config.layout.width = 1200.0;
        config.profile.center_label = "Octocat".to_string();

        let profiler = SkillProfiler::from_config(&config);
        assert_eq!(profiler.center_label(), "Octocat");

        let profile = profiler.profile(&signal(), &catalog()).unwrap();
        assert_eq!(profile.layout.width, 1200.0);
        assert_eq!(profile.layout.nodes[0].center_point.x, 600.0);
    }

    #[test]
    fn test_cycle_surfaces_as_error() {
        let mut catalog = TaxonomyCatalog::new();
        catalog.insert(TaxonomyEntry::new("a", "A", Category::Tools).with_keywords(["alpha"]).with_parent("b"));
        catalog.insert(TaxonomyEntry::new("b", "B", Category::Tools).with_parent("a"));

        let signal = RepoSignal::from_repos(&[RepoRecord::new("alpha")]);
        let err = SkillProfiler::new().profile(&signal, &catalog).unwrap_err();
        assert!(matches!(err, Error::TaxonomyCycle { .. }));
    }

    #[tokio::test]
    async fn test_profile_from_store() {
        let loader = InMemoryTaxonomyLoader::new().with_source(
            "mini",
            serde_json::json!({
                "entries": [
                    {"key": "rust", "label": "Rust", "category": "language"},
                    {"key": "tokio", "label": "Tokio", "category": "framework", "parent": "rust", "keywords": ["tokio"]}
                ]
            }),
        );
        let store = TaxonomyStore::new(loader);
        let signal = RepoSignal::from_repos(&[RepoRecord::new("server")
            .with_topics(["tokio"])
            .with_bytes("Rust", 1000)]);

        let profile = SkillProfiler::new()
            .profile_from_store(&store, &["mini"], &signal)
            .await
            .unwrap();

        let names: Vec<_> = profile.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Tokio"]);
        assert_eq!(profile.skill("Tokio").unwrap().parent_name.as_deref(), Some("Rust"));
    }
}
