//! Centralized error types for unigraph.

use thiserror::Error;

/// Main error type for ingestion runs.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("XML parse error at position {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown node: {0}")]
    UnknownNode(String),
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

impl IngestError {
    /// Create a store-unavailable error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Whether re-running the whole ingestion could succeed.
    ///
    /// Malformed input never gets better on retry; connectivity and file
    /// access might.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Io(_))
    }
}

/// A required field is missing or has the wrong shape in a parsed entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {reason}")]
pub struct MappingError {
    /// Dotted path of the offending field, e.g. `entry.reference[1].citation.title`.
    pub path: String,
    pub reason: String,
}

impl MappingError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: "required field is missing".to_string(),
        }
    }

    pub fn expected_text(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: "expected a text value".to_string(),
        }
    }
}
