//! Skill matching against a taxonomy catalog
//!
//! Languages are scored from their share of the byte histogram; every other
//! entry is scored from keyword hits in repository text.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::types::{DetectedSkill, MAX_LEVEL};
use crate::signal::RepoSignal;
use crate::taxonomy::{ParentLink, TaxonomyCatalog, TaxonomyEntry};

/// Language share thresholds (percent after weighting) and their levels
const LANGUAGE_THRESHOLDS: [(f64, u8); 5] = [(30.0, 5), (20.0, 4), (10.0, 3), (5.0, 2), (1.0, 1)];

/// Repositories per keyword level step
const REPOS_PER_LEVEL: f64 = 1.5;

/// Decides whether a keyword occurs in a piece of text
pub trait TextMatcher: Send + Sync {
    fn matches(&self, haystack: &str, keyword: &str) -> bool;
}

/// Plain substring containment
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TextMatcher for SubstringMatcher {
    fn matches(&self, haystack: &str, keyword: &str) -> bool {
        !keyword.is_empty() && haystack.contains(keyword)
    }
}

/// Level for a weighted language share in percent; 0 means not detected
pub fn language_level(adjusted_percentage: f64) -> u8 {
    LANGUAGE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| adjusted_percentage >= *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(0)
}

/// Level for a keyword match seen in `repo_count` repositories
///
/// A text match with no attributable repository lands on level 1.
pub fn keyword_level(repo_count: usize) -> u8 {
    let steps = (repo_count as f64 / REPOS_PER_LEVEL).ceil() as u64;
    steps.saturating_add(1).min(u64::from(MAX_LEVEL)) as u8
}

/// Scores taxonomy entries against a repository signal
#[derive(Debug, Clone, Default)]
pub struct SkillMatcher<M: TextMatcher = SubstringMatcher> {
    matcher: M,
}

impl SkillMatcher<SubstringMatcher> {
    /// Create a matcher using substring keyword detection
    pub fn new() -> Self {
        Self {
            matcher: SubstringMatcher,
        }
    }
}

impl<M: TextMatcher> SkillMatcher<M> {
    /// Create a matcher with a custom keyword detector
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Detect skills, keyed by skill name
    ///
    /// Languages are evaluated first, then the remaining categories in
    /// declaration order. A later detection overwrites an earlier one with
    /// the same name.
    pub fn detect(&self, signal: &RepoSignal, catalog: &TaxonomyCatalog) -> BTreeMap<String, DetectedSkill> {
        let mut detected = BTreeMap::new();

        for skill in self.score_languages(signal, catalog) {
            insert_detection(&mut detected, skill);
        }
        for skill in self.score_keywords(signal, catalog) {
            insert_detection(&mut detected, skill);
        }

        debug!(detected = detected.len(), "Skill matching complete");
        detected
    }

    fn score_languages(&self, signal: &RepoSignal, catalog: &TaxonomyCatalog) -> Vec<DetectedSkill> {
        let total = signal.total_bytes();
        if total == 0 {
            return Vec::new();
        }

        let mut skills = Vec::new();
        for (language, bytes) in &signal.language_bytes {
            let Some(entry) = catalog.find_language(language) else {
                debug!(language = %language, "No taxonomy entry for language");
                continue;
            };

            let percentage = *bytes as f64 / total as f64 * 100.0;
            let adjusted = percentage * entry.weight;
            let level = language_level(adjusted);
            if level == 0 {
                continue;
            }

            let repo_count = self.count_repos(signal, &entry.keywords);
            skills.push(
                DetectedSkill::from_entry(entry, level)
                    .with_parent(parent_name(catalog, entry))
                    .with_repo_count(repo_count)
                    .with_share(percentage),
            );
        }
        skills
    }

    fn score_keywords(&self, signal: &RepoSignal, catalog: &TaxonomyCatalog) -> Vec<DetectedSkill> {
        if signal.search_text.is_empty() {
            return Vec::new();
        }

        let mut skills = Vec::new();
        for entry in catalog.keyword_entries() {
            let text_match = entry
                .keywords
                .iter()
                .any(|k| self.matcher.matches(&signal.search_text, k));
            if !text_match {
                continue;
            }

            let repo_count = self.count_repos(signal, &entry.keywords);
            skills.push(
                DetectedSkill::from_entry(entry, keyword_level(repo_count))
                    .with_parent(parent_name(catalog, entry))
                    .with_repo_count(repo_count),
            );
        }
        skills
    }

    /// Repositories with at least one keyword in any of their text fields
    fn count_repos(&self, signal: &RepoSignal, keywords: &BTreeSet<String>) -> usize {
        signal
            .repo_topics
            .iter()
            .filter(|fields| {
                fields
                    .iter()
                    .any(|field| keywords.iter().any(|k| self.matcher.matches(field, k)))
            })
            .count()
    }
}

/// Detect skills with the default substring matcher
pub fn detect_skills(signal: &RepoSignal, catalog: &TaxonomyCatalog) -> BTreeMap<String, DetectedSkill> {
    SkillMatcher::new().detect(signal, catalog)
}

fn insert_detection(detected: &mut BTreeMap<String, DetectedSkill>, skill: DetectedSkill) {
    if let Some(previous) = detected.insert(skill.name.clone(), skill) {
        debug!(
            name = %previous.name,
            previous_category = %previous.category,
            "Later rule overwrote earlier detection"
        );
    }
}

fn parent_name(catalog: &TaxonomyCatalog, entry: &TaxonomyEntry) -> Option<String> {
    match catalog.parent_of(entry) {
        ParentLink::Root => None,
        ParentLink::Found(parent) => Some(parent.display_name.clone()),
        ParentLink::Missing(key) => {
            warn!(
                key = %entry.key,
                parent = %key,
                "Skipping dangling taxonomy parent reference"
            );
            None
        }
    }
}
