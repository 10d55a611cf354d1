//! Merged, addressable taxonomy catalog

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use super::types::{Category, TaxonomyEntry, TaxonomySource};
use crate::error::{Error, Result};

/// How an entry's parent reference resolves against the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentLink<'a> {
    /// The entry declares no parent
    Root,
    /// The entry names a parent key that no loaded source defines
    Missing(&'a str),
    Found(&'a TaxonomyEntry),
}

/// A mapping from entry key to entry, merged from one or more sources
#[derive(Debug, Clone, Default)]
pub struct TaxonomyCatalog {
    entries: BTreeMap<String, TaxonomyEntry>,
    sources: Vec<String>,
}

impl TaxonomyCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog by merging sources in order
    pub fn from_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a TaxonomySource>,
    {
        let mut catalog = Self::new();
        for source in sources {
            catalog.merge_source(source);
        }
        catalog
    }

    /// Merge all entries of a source; later sources win on metadata
    pub fn merge_source(&mut self, source: &TaxonomySource) {
        for entry in &source.entries {
            self.insert(entry.clone());
        }
        if !self.sources.contains(&source.name) {
            self.sources.push(source.name.clone());
        }
        debug!(
            source = %source.name,
            entries = source.len(),
            total = self.entries.len(),
            "Merged taxonomy source"
        );
    }

    /// Insert a single entry, merging with an existing entry of the same key
    pub fn insert(&mut self, entry: TaxonomyEntry) {
        match self.entries.get_mut(&entry.key) {
            Some(existing) => {
                debug!(key = %entry.key, "Merging duplicate taxonomy key");
                existing.merge_from(entry);
            }
            None => {
                self.entries.insert(entry.key.clone(), entry);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TaxonomyEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of merged sources, in load order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// All entries in key order
    pub fn entries(&self) -> impl Iterator<Item = &TaxonomyEntry> {
        self.entries.values()
    }

    /// Find the language entry a byte-histogram language name refers to
    ///
    /// Exact key matches win over display-name matches, which win over keyword matches.
    pub fn find_language(&self, language: &str) -> Option<&TaxonomyEntry> {
        let needle = language.trim().to_lowercase();
        let languages = || self.entries.values().filter(|e| e.category == Category::Language);

        languages()
            .find(|e| e.key == needle)
            .or_else(|| languages().find(|e| e.display_name.to_lowercase() == needle))
            .or_else(|| languages().find(|e| e.keywords.contains(&needle)))
    }

    /// Non-language entries in matcher evaluation order (category, then key)
    pub fn keyword_entries(&self) -> Vec<&TaxonomyEntry> {
        let mut entries: Vec<_> = self
            .entries
            .values()
            .filter(|e| e.category != Category::Language)
            .collect();
        entries.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.key.cmp(&b.key)));
        entries
    }

    /// Resolve an entry's parent reference
    pub fn parent_of<'a>(&'a self, entry: &'a TaxonomyEntry) -> ParentLink<'a> {
        match entry.parent_key.as_deref() {
            None => ParentLink::Root,
            Some(parent) => match self.entries.get(parent) {
                Some(found) => ParentLink::Found(found),
                None => ParentLink::Missing(parent),
            },
        }
    }

    /// Ancestors of `key`, nearest first
    ///
    /// A parent key missing from the catalog ends the chain. A repeated key
    /// is a cycle and fails with [`Error::TaxonomyCycle`].
    pub fn ancestors(&self, key: &str) -> Result<Vec<&TaxonomyEntry>> {
        let start = self
            .entries
            .get(key)
            .ok_or_else(|| Error::EntryNotFound(key.to_string()))?;

        let mut chain = vec![start.key.clone()];
        let mut seen: HashSet<&str> = HashSet::from([start.key.as_str()]);
        let mut ancestors = Vec::new();
        let mut current = start;

        loop {
            match self.parent_of(current) {
                ParentLink::Root => break,
                ParentLink::Missing(parent) => {
                    warn!(
                        key = %current.key,
                        parent = %parent,
                        "Taxonomy parent not in catalog, treating entry as root"
                    );
                    break;
                }
                ParentLink::Found(parent) => {
                    chain.push(parent.key.clone());
                    if !seen.insert(parent.key.as_str()) {
                        return Err(Error::TaxonomyCycle {
                            key: start.key.clone(),
                            chain,
                        });
                    }
                    ancestors.push(parent);
                    current = parent;
                }
            }
        }

        Ok(ancestors)
    }

    /// Depth of `key` in the taxonomy forest (root = 0)
    pub fn depth_of(&self, key: &str) -> Result<usize> {
        self.ancestors(key).map(|a| a.len())
    }

    /// Check every parent chain for cycles
    pub fn validate(&self) -> Result<()> {
        for key in self.entries.keys() {
            self.ancestors(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_source() -> TaxonomySource {
        TaxonomySource::new(
            "web",
            vec![
                TaxonomyEntry::new("javascript", "JavaScript", Category::Language)
                    .with_keywords(["javascript", "js"]),
                TaxonomyEntry::new("react", "React", Category::Framework)
                    .with_keywords(["react"])
                    .with_parent("javascript"),
                TaxonomyEntry::new("redux", "Redux", Category::Framework)
                    .with_keywords(["redux"])
                    .with_parent("react"),
            ],
        )
    }

    #[test]
    fn test_from_sources_merges_duplicates() {
        let extra = TaxonomySource::new(
            "extra",
            vec![TaxonomyEntry::new("react", "React", Category::Frontend).with_keywords(["reactjs"])],
        );
        let web = web_source();
        let catalog = TaxonomyCatalog::from_sources([&web, &extra]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.sources(), &["web".to_string(), "extra".to_string()]);

        let react = catalog.get("react").unwrap();
        assert_eq!(react.category, Category::Frontend);
        assert!(react.keywords.contains("react"));
        assert!(react.keywords.contains("reactjs"));
        // The later entry declares no parent, so it wins with none.
        assert_eq!(react.parent_key, None);
    }

    #[test]
    fn test_find_language_prefers_key_then_name_then_keyword() {
        let catalog = TaxonomyCatalog::from_sources([&web_source()]);
        assert_eq!(catalog.find_language("JavaScript").unwrap().key, "javascript");
        assert_eq!(catalog.find_language("js").unwrap().key, "javascript");
        assert!(catalog.find_language("React").is_none());
        assert!(catalog.find_language("Python").is_none());
    }

    #[test]
    fn test_keyword_entries_excludes_languages_and_is_ordered() {
        let catalog = TaxonomyCatalog::from_sources([&web_source()]);
        let keys: Vec<_> = catalog.keyword_entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["react", "redux"]);
    }

    #[test]
    fn test_ancestors_and_depth() {
        let catalog = TaxonomyCatalog::from_sources([&web_source()]);
        let ancestors: Vec<_> = catalog
            .ancestors("redux")
            .unwrap()
            .iter()
            .map(|e| e.key.clone())
            .collect();

        assert_eq!(ancestors, vec!["react", "javascript"]);
        assert_eq!(catalog.depth_of("javascript").unwrap(), 0);
        assert_eq!(catalog.depth_of("redux").unwrap(), 2);
    }

    #[test]
    fn test_missing_parent_is_treated_as_root() {
        let mut catalog = TaxonomyCatalog::new();
        catalog.insert(TaxonomyEntry::new("vue", "Vue", Category::Framework).with_parent("ghost"));

        let vue = catalog.get("vue").unwrap();
        assert_eq!(catalog.parent_of(vue), ParentLink::Missing("ghost"));
        assert_eq!(catalog.depth_of("vue").unwrap(), 0);
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut catalog = TaxonomyCatalog::new();
        catalog.insert(TaxonomyEntry::new("a", "A", Category::Concept).with_parent("b"));
        catalog.insert(TaxonomyEntry::new("b", "B", Category::Concept).with_parent("a"));

        let err = catalog.ancestors("a").unwrap_err();
        match err {
            Error::TaxonomyCycle { key, chain } => {
                assert_eq!(key, "a");
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let mut catalog = TaxonomyCatalog::new();
        catalog.insert(TaxonomyEntry::new("loop", "Loop", Category::Concept).with_parent("loop"));
        assert!(matches!(catalog.depth_of("loop"), Err(Error::TaxonomyCycle { .. })));
    }

    #[test]
    fn test_unknown_key() {
        let catalog = TaxonomyCatalog::new();
        assert!(matches!(catalog.ancestors("nope"), Err(Error::EntryNotFound(_))));
    }
}
