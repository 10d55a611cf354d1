//! Repository signal aggregation
//!
//! Turns raw repository records into the normalized [`RepoSignal`] the
//! matcher consumes: a language byte histogram plus lower-cased text.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// A repository as returned by a hosting API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Primary language reported by the host
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Per-language byte counts, when fetched
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
}

impl RepoRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bytes(mut self, language: impl Into<String>, bytes: u64) -> Self {
        self.languages.insert(language.into(), bytes);
        self
    }

    /// Lower-cased name, description and topics
    fn text_fields(&self) -> BTreeSet<String> {
        std::iter::once(self.name.as_str())
            .chain(self.description.as_deref())
            .chain(self.topics.iter().map(String::as_str))
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Normalized input to the skill matcher
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoSignal {
    /// Bytes of code per language across all repositories
    #[serde(default)]
    pub language_bytes: BTreeMap<String, u64>,
    /// Lower-cased concatenation of names, descriptions and topics
    #[serde(default)]
    pub search_text: String,
    /// Lower-cased text fields of each repository
    #[serde(default)]
    pub repo_topics: Vec<BTreeSet<String>>,
}

impl RepoSignal {
    /// Aggregate repository records
    ///
    /// A repository without a byte histogram contributes one unit to its
    /// primary language so it is not lost entirely.
    pub fn from_repos(repos: &[RepoRecord]) -> Self {
        let mut language_bytes: BTreeMap<String, u64> = BTreeMap::new();
        let mut texts = Vec::with_capacity(repos.len());
        let mut repo_topics = Vec::with_capacity(repos.len());

        for repo in repos {
            if repo.languages.is_empty() {
                if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
                    let count = language_bytes.entry(language.to_string()).or_default();
                    *count = count.saturating_add(1);
                }
            } else {
                for (language, bytes) in &repo.languages {
                    let count = language_bytes.entry(language.clone()).or_default();
                    *count = count.saturating_add(*bytes);
                }
            }

            let fields = repo.text_fields();
            texts.push(fields.iter().cloned().collect::<Vec<_>>().join(" "));
            repo_topics.push(fields);
        }

        let signal = Self {
            language_bytes,
            search_text: texts.join(" "),
            repo_topics,
        };
        debug!(
            repos = repos.len(),
            languages = signal.language_bytes.len(),
            "Aggregated repository signal"
        );
        signal
    }

    /// Parse a signal from JSON
    ///
    /// Accepts a list of repositories, `{"repos": [...]}`, or an
    /// already-aggregated signal object.
    pub fn from_json(value: &Value) -> Result<Self> {
        if value.is_array() {
            let repos: Vec<RepoRecord> = serde_json::from_value(value.clone())?;
            return Ok(Self::from_repos(&repos));
        }
        if let Some(repos) = value.get("repos") {
            let repos: Vec<RepoRecord> = serde_json::from_value(repos.clone())?;
            return Ok(Self::from_repos(&repos));
        }
        if value.get("language_bytes").is_some() || value.get("search_text").is_some() {
            let mut signal: RepoSignal = serde_json::from_value(value.clone())?;
            signal.search_text = signal.search_text.to_lowercase();
            return Ok(signal);
        }
        Err(Error::InvalidSignal(
            "expected a repository list, {\"repos\": [...]}, or a signal object".to_string(),
        ))
    }

    /// Sum of all language bytes
    ///
    /// Widened so that histograms near `u64::MAX` cannot overflow.
    pub fn total_bytes(&self) -> u128 {
        self.language_bytes.values().map(|&bytes| u128::from(bytes)).sum()
    }

    /// Whether the signal carries neither bytes nor text
    pub fn is_empty(&self) -> bool {
        self.total_bytes() == 0 && self.search_text.trim().is_empty()
    }

    pub fn repo_count(&self) -> usize {
        self.repo_topics.len()
    }
}
