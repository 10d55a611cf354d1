//! Error types for skilltree

use thiserror::Error;

/// Result type alias using skilltree's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Skilltree error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Taxonomy errors (E001-E099)
    #[error("Taxonomy source '{0}' not found. Run `skilltree taxonomy list` to see available sources.")]
    TaxonomySourceNotFound(String),

    #[error("Taxonomy source '{source_name}' could not be parsed: {message}")]
    TaxonomyParse {
        source_name: String,
        message: String,
    },

    #[error("Cycle in taxonomy parent chain starting at '{key}': {}", chain.join(" -> "))]
    TaxonomyCycle { key: String, chain: Vec<String> },

    #[error("Taxonomy entry '{0}' not found in the loaded catalog.")]
    EntryNotFound(String),

    // Signal errors (E100-E199)
    #[error("Invalid repository signal: {0}")]
    InvalidSignal(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::TaxonomySourceNotFound(_) => "E001",
            Self::TaxonomyParse { .. } => "E002",
            Self::TaxonomyCycle { .. } => "E003",
            Self::EntryNotFound(_) => "E004",
            Self::InvalidSignal(_) => "E100",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) | Self::Json(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::TaxonomySourceNotFound(_) => Some("skilltree taxonomy list".to_string()),
            Self::TaxonomyCycle { key, .. } => Some(format!(
                "Fix the parent reference of '{}' in its taxonomy source, then run `skilltree taxonomy check`",
                key
            )),
            Self::TaxonomyParse { source_name, .. } => {
                Some(format!("skilltree taxonomy show {}", source_name))
            }
            Self::ConfigError(_) => Some("skilltree config list".to_string()),
            _ => None,
        }
    }

    /// Whether the error points at a taxonomy authoring defect rather than bad user input
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::TaxonomyCycle { .. } | Self::TaxonomyParse { .. })
    }
}
