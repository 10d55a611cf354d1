//! Technology taxonomy: entries, catalogs and the load-and-cache store
//!
//! # Architecture
//!
//! - **TaxonomyEntry**: one technology with keywords, category and parent
//! - **normalize**: converts heterogeneous roadmap JSON into entries
//! - **TaxonomyCatalog**: entries merged from several sources by key
//! - **TaxonomyStore**: memoized, single-flight loading of named sources
//!
//! # Example
//!
//! ```rust,ignore
//! use skilltree_core::taxonomy::TaxonomyStore;
//!
//! let store = TaxonomyStore::from_dir("~/.config/skilltree/taxonomies");
//! let catalog = store.catalog(&["core", "frontend"]).await?;
//! catalog.validate()?;
//! ```

mod builtin;
mod catalog;
pub mod normalize;
mod store;
mod types;

pub use builtin::{BUILTIN_SOURCE, builtin_source};
pub use catalog::{ParentLink, TaxonomyCatalog};
pub use normalize::normalize_source;
pub use store::{FsTaxonomyLoader, InMemoryTaxonomyLoader, TaxonomyLoader, TaxonomyStore};
pub use types::{Category, Difficulty, EntryMetadata, TaxonomyEntry, TaxonomySource};
