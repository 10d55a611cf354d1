//! Taxonomy bundled with the crate

use serde_json::Value;

use super::normalize::normalize_source;
use super::types::TaxonomySource;
use crate::error::{Error, Result};

/// Name of the bundled source
pub const BUILTIN_SOURCE: &str = "core";

const CORE_JSON: &str = include_str!("../../data/core.json");

/// Raw JSON of a bundled source, if `name` is one
pub fn builtin_raw(name: &str) -> Option<Result<Value>> {
    (name == BUILTIN_SOURCE).then(|| {
        serde_json::from_str(CORE_JSON).map_err(|e| Error::TaxonomyParse {
            source_name: name.to_string(),
            message: e.to_string(),
        })
    })
}

/// The bundled `core` source, normalized
pub fn builtin_source() -> Result<TaxonomySource> {
    let raw = builtin_raw(BUILTIN_SOURCE)
        .ok_or_else(|| Error::TaxonomySourceNotFound(BUILTIN_SOURCE.to_string()))??;
    normalize_source(BUILTIN_SOURCE, &raw)
}
