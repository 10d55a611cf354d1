//! Taxonomy data types
//!
//! This module defines the normalized shape every taxonomy source is
//! converted into at load time.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Technology categories, in the order the matcher evaluates them
///
/// The declaration order is part of the matching contract: languages are
/// scored first and later categories overwrite earlier ones when two
/// entries share a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Programming languages, scored from byte histograms
    Language,
    Framework,
    Database,
    Devops,
    Cloud,
    Testing,
    Security,
    Frontend,
    Backend,
    Mobile,
    DataScience,
    Tools,
    /// Anything the categorizer could not place
    Concept,
    /// Profile-level labels; rendered only as the diagram center
    Meta,
}

impl Category {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Framework => "framework",
            Self::Database => "database",
            Self::Devops => "devops",
            Self::Cloud => "cloud",
            Self::Testing => "testing",
            Self::Security => "security",
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Mobile => "mobile",
            Self::DataScience => "data-science",
            Self::Tools => "tools",
            Self::Concept => "concept",
            Self::Meta => "meta",
        }
    }

    /// Parse from string, accepting the aliases found in upstream taxonomies
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "language" | "programming-language" | "lang" => Self::Language,
            "framework" | "library" | "lib" => Self::Framework,
            "database" | "db" => Self::Database,
            "devops" | "ci-cd" => Self::Devops,
            "cloud" => Self::Cloud,
            "testing" | "test" | "qa" => Self::Testing,
            "security" | "sec" => Self::Security,
            "frontend" | "front-end" => Self::Frontend,
            "backend" | "back-end" => Self::Backend,
            "mobile" => Self::Mobile,
            "data-science" | "datascience" | "ai" | "ml" => Self::DataScience,
            "tools" | "tool" | "tooling" => Self::Tools,
            "meta" | "label" => Self::Meta,
            _ => Self::Concept,
        }
    }

    /// Human-readable label used for category ring nodes
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Language => "Languages",
            Self::Framework => "Frameworks",
            Self::Database => "Databases",
            Self::Devops => "DevOps",
            Self::Cloud => "Cloud",
            Self::Testing => "Testing",
            Self::Security => "Security",
            Self::Frontend => "Frontend",
            Self::Backend => "Backend",
            Self::Mobile => "Mobile",
            Self::DataScience => "Data Science",
            Self::Tools => "Tools",
            Self::Concept => "Concepts",
            Self::Meta => "Profile",
        }
    }

    /// Get all categories in evaluation order
    pub fn all() -> &'static [Category] {
        &[
            Self::Language,
            Self::Framework,
            Self::Database,
            Self::Devops,
            Self::Cloud,
            Self::Testing,
            Self::Security,
            Self::Frontend,
            Self::Backend,
            Self::Mobile,
            Self::DataScience,
            Self::Tools,
            Self::Concept,
            Self::Meta,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Estimated learning difficulty of a taxonomy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "advanced" | "hard" => Self::Advanced,
            "intermediate" | "medium" => Self::Intermediate,
            _ => Self::Beginner,
        }
    }
}

/// Display metadata attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Icon identifier for renderers
    pub icon: Option<String>,
    /// Free-form description from the source
    pub description: String,
    pub difficulty: Difficulty,
    /// Whether the source roadmap marks this entry as required
    pub required: bool,
}

/// A single technology in the taxonomy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// Unique key within a source (lower-case slug)
    pub key: String,
    /// Name shown to users; also the detected skill name
    pub display_name: String,
    /// Lower-cased substrings that signal this technology
    pub keywords: BTreeSet<String>,
    pub category: Category,
    /// Key of the parent entry, if any
    pub parent_key: Option<String>,
    /// Multiplier applied to language byte shares
    pub weight: f64,
    pub metadata: EntryMetadata,
}

impl TaxonomyEntry {
    /// Create a new entry with no keywords, no parent and unit weight
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, category: Category) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            keywords: BTreeSet::new(),
            category,
            parent_key: None,
            weight: 1.0,
            metadata: EntryMetadata::default(),
        }
    }

    /// Set the keywords (lower-cased, blanks dropped)
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    /// Set the parent key
    pub fn with_parent(mut self, parent_key: impl Into<String>) -> Self {
        self.parent_key = Some(parent_key.into());
        self
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set metadata
    pub fn with_metadata(mut self, metadata: EntryMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Merge a later-loaded entry with the same key into this one
    ///
    /// Metadata, display fields and parent come from `later`; keyword sets are unioned.
    pub fn merge_from(&mut self, later: TaxonomyEntry) {
        let mut keywords = std::mem::take(&mut self.keywords);
        keywords.extend(later.keywords);
        *self = TaxonomyEntry { keywords, ..later };
    }
}

/// All entries loaded from one named source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomySource {
    pub name: String,
    pub entries: Vec<TaxonomyEntry>,
}

impl TaxonomySource {
    pub fn new(name: impl Into<String>, entries: Vec<TaxonomyEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry count per category, most populated first
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.category).or_default() += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}
