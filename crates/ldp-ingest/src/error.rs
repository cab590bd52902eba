//! Error types for the ingest pipeline
//!
//! Structural problems (bad config, unreachable database) are fatal at
//! startup and surface through [`IngestError`]. Per-record problems never
//! appear here; the core absorbs those into verdicts.

use thiserror::Error;

/// Result type alias for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Error type for pipeline setup and collaborator failures
#[derive(Error, Debug)]
pub enum IngestError {
    /// Pipeline configuration is missing or inconsistent
    #[error("Configuration error: {0}. Check the pipeline YAML and environment variables.")]
    Config(String),

    /// YAML parsing failed
    #[error("Failed to parse config YAML: {0}. Check the file syntax at the indicated line/column.")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failed (reject payloads)
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your internet connection and the source URL.")]
    Http(#[from] reqwest::Error),

    /// Database operation failed
    #[error("Database error: {0}. Check DATABASE_URL and that PostgreSQL is reachable.")]
    Database(#[from] sqlx::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check the path and read permissions.")]
    Io(#[from] std::io::Error),

    /// A source yielded nothing usable and was skipped.
    /// The field is `name`, not `source`: thiserror reserves `source` for
    /// the error cause chain.
    #[error("Source '{name}' produced no usable data: {reason}")]
    Source { name: String, reason: String },
}

impl IngestError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a source-level failure
    pub fn source(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Source {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_failure_message_names_the_source() {
        let err = IngestError::source("openlibrary_books", "no records fetched");
        assert_eq!(
            err.to_string(),
            "Source 'openlibrary_books' produced no usable data: no records fetched"
        );
    }
}
