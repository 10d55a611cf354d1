//! Load-and-cache store for taxonomy sources
//!
//! Each named source is fetched and normalized at most once per store.
//! Concurrent requests for the same uncached source wait on a single
//! in-flight load instead of racing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use super::builtin::{BUILTIN_SOURCE, builtin_raw};
use super::catalog::TaxonomyCatalog;
use super::normalize::normalize_source;
use super::types::TaxonomySource;
use crate::error::{Error, Result};

/// Fetches the raw JSON of a named taxonomy source
#[async_trait]
pub trait TaxonomyLoader: Send + Sync {
    /// Fetch the raw document for `source`
    async fn fetch(&self, source: &str) -> Result<Value>;

    /// Names of sources this loader can serve
    async fn available(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Loads `<dir>/<source>.json`, falling back to the bundled source
#[derive(Debug, Clone, Default)]
pub struct FsTaxonomyLoader {
    dir: Option<PathBuf>,
    builtin: bool,
}

impl FsTaxonomyLoader {
    /// Loader over a taxonomy directory, with the bundled source as fallback
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            builtin: true,
        }
    }

    /// Loader that only serves the bundled source
    pub fn builtin_only() -> Self {
        Self {
            dir: None,
            builtin: true,
        }
    }

    /// Disable the bundled fallback
    pub fn without_builtin(mut self) -> Self {
        self.builtin = false;
        self
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn source_path(&self, source: &str) -> Result<Option<PathBuf>> {
        if source.is_empty() || source.contains(['/', '\\']) || source.starts_with('.') {
            return Err(Error::InvalidInput(format!(
                "Invalid taxonomy source name: '{}'",
                source
            )));
        }
        Ok(self.dir.as_ref().map(|d| d.join(format!("{}.json", source))))
    }
}

#[async_trait]
impl TaxonomyLoader for FsTaxonomyLoader {
    async fn fetch(&self, source: &str) -> Result<Value> {
        if let Some(path) = self.source_path(source)? {
            if tokio::fs::try_exists(&path).await? {
                debug!(path = %path.display(), "Reading taxonomy file");
                let contents = tokio::fs::read_to_string(&path).await?;
                return serde_json::from_str(&contents).map_err(|e| Error::TaxonomyParse {
                    source_name: source.to_string(),
                    message: e.to_string(),
                });
            }
        }

        if self.builtin {
            if let Some(raw) = builtin_raw(source) {
                return raw;
            }
        }

        Err(Error::TaxonomySourceNotFound(source.to_string()))
    }

    async fn available(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        if let Some(dir) = &self.dir {
            if tokio::fs::try_exists(dir).await? {
                let mut entries = tokio::fs::read_dir(dir).await?;
                while let Some(entry) = entries.next_entry().await? {
                    let path = entry.path();
                    if path.extension().and_then(|e| e.to_str()) != Some("json") {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        if !stem.starts_with('.') {
                            names.push(stem.to_string());
                        }
                    }
                }
            }
        }

        if self.builtin && !names.iter().any(|n| n == BUILTIN_SOURCE) {
            names.push(BUILTIN_SOURCE.to_string());
        }

        names.sort();
        Ok(names)
    }
}

/// Serves sources from memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaxonomyLoader {
    sources: HashMap<String, Value>,
}

impl InMemoryTaxonomyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw source document
    pub fn with_source(mut self, name: impl Into<String>, raw: Value) -> Self {
        self.sources.insert(name.into(), raw);
        self
    }
}

#[async_trait]
impl TaxonomyLoader for InMemoryTaxonomyLoader {
    async fn fetch(&self, source: &str) -> Result<Value> {
        self.sources
            .get(source)
            .cloned()
            .ok_or_else(|| Error::TaxonomySourceNotFound(source.to_string()))
    }

    async fn available(&self) -> Result<Vec<String>> {
        let mut names: Vec<_> = self.sources.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

type SourceCell = Arc<OnceCell<Arc<TaxonomySource>>>;

/// Memoizing taxonomy store
pub struct TaxonomyStore {
    loader: Arc<dyn TaxonomyLoader>,
    cache: Mutex<HashMap<String, SourceCell>>,
    loads: AtomicUsize,
}

impl std::fmt::Debug for TaxonomyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaxonomyStore")
            .field("loads", &self.loads.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl TaxonomyStore {
    /// Create a store over the given loader
    pub fn new(loader: impl TaxonomyLoader + 'static) -> Self {
        Self {
            loader: Arc::new(loader),
            cache: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Store over a taxonomy directory with the bundled fallback
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(FsTaxonomyLoader::new(dir))
    }

    /// Store that only knows the bundled source
    pub fn builtin() -> Self {
        Self::new(FsTaxonomyLoader::builtin_only())
    }

    /// Get a source, loading and normalizing it on first use
    pub async fn source(&self, name: &str) -> Result<Arc<TaxonomySource>> {
        let cell = {
            let mut cache = self.cache.lock().await;
            cache.entry(name.to_string()).or_default().clone()
        };

        let source = cell
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                let raw = self.loader.fetch(name).await?;
                let source = normalize_source(name, &raw)?;
                info!(source = %name, entries = source.len(), "Loaded taxonomy source");
                Ok::<_, Error>(Arc::new(source))
            })
            .await?;

        Ok(Arc::clone(source))
    }

    /// Load the named sources and merge them in order into one catalog
    pub async fn catalog<S: AsRef<str>>(&self, names: &[S]) -> Result<TaxonomyCatalog> {
        let mut catalog = TaxonomyCatalog::new();
        let mut merged: Vec<&str> = Vec::new();

        for name in names {
            let name: &str = name.as_ref();
            if merged.contains(&name) {
                continue;
            }
            let source = self.source(name).await?;
            catalog.merge_source(&source);
            merged.push(name);
        }

        Ok(catalog)
    }

    /// Names of sources currently cached, sorted
    pub async fn cached_sources(&self) -> Vec<String> {
        let cache = self.cache.lock().await;
        let mut names: Vec<_> = cache
            .iter()
            .filter(|(_, cell)| cell.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Sources the underlying loader can serve
    pub async fn available_sources(&self) -> Result<Vec<String>> {
        self.loader.available().await
    }

    /// Number of load attempts issued to the loader
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
