//! Pipeline configuration
//!
//! One YAML file describes every source: where to fetch it, the field
//! schema, the validation rules, and the staging table to load into. The
//! database URL can be overridden by the `DATABASE_URL` environment variable
//! (loaded from `.env` if present). Malformed configuration is fatal at
//! startup; nothing here is recoverable per record.

use crate::error::{IngestError, Result};
use crate::load::is_valid_identifier;
use ldp_core::{RuleSet, Schema, DEFAULT_NULL_SENTINELS};
use serde::Deserialize;
use std::path::Path;

/// Default number of pages fetched per source
pub const DEFAULT_PAGES: u32 = 10;

/// Default pause between page requests in milliseconds
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// Fully resolved pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// PostgreSQL connection string
    pub db_url: String,
    /// Pages fetched per source unless the source overrides it
    pub pages: u32,
    /// Pause between page requests
    pub request_delay_ms: u64,
    /// Null-like sentinels unified to the null marker
    pub null_sentinels: Vec<String>,
    /// Sources to ingest, in run order
    pub sources: Vec<SourceConfig>,
}

/// One API source and its processing declaration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Source name used in logs and reject rows
    pub name: String,
    /// Endpoint URL including its query string; `&page=N` is appended
    pub url: String,
    /// Staging table receiving accepted records
    pub target_table: String,
    /// Field used for deduplication and upsert conflict target
    pub primary_key: String,
    /// Field name to declared type
    pub schema: Schema,
    /// Ordered validation rules
    #[serde(default)]
    pub rules: RuleSet,
    /// Per-source page count override
    #[serde(default)]
    pub pages: Option<u32>,
}

impl SourceConfig {
    /// Pages to fetch for this source given the pipeline default
    pub fn pages_or(&self, default: u32) -> u32 {
        self.pages.unwrap_or(default)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    sources: Vec<SourceConfig>,
}

#[derive(Debug, Deserialize)]
struct Defaults {
    #[serde(default)]
    db_url: Option<String>,
    #[serde(default = "default_pages")]
    pages: u32,
    #[serde(default = "default_request_delay_ms")]
    request_delay_ms: u64,
    #[serde(default = "default_null_sentinels")]
    null_sentinels: Vec<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            db_url: None,
            pages: default_pages(),
            request_delay_ms: default_request_delay_ms(),
            null_sentinels: default_null_sentinels(),
        }
    }
}

fn default_pages() -> u32 {
    DEFAULT_PAGES
}

fn default_request_delay_ms() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}

fn default_null_sentinels() -> Vec<String> {
    DEFAULT_NULL_SENTINELS.iter().map(|s| s.to_string()).collect()
}

impl PipelineConfig {
    /// Load and validate the pipeline configuration from a YAML file.
    ///
    /// Reads `.env` if present; `DATABASE_URL` takes precedence over
    /// `defaults.db_url` in the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text, std::env::var("DATABASE_URL").ok())
    }

    fn from_yaml(text: &str, db_url_override: Option<String>) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(text)?;

        let db_url = db_url_override
            .or(file.defaults.db_url)
            .ok_or_else(|| {
                IngestError::config("no database URL: set DATABASE_URL or defaults.db_url")
            })?;

        let config = Self {
            db_url,
            pages: file.defaults.pages,
            request_delay_ms: file.defaults.request_delay_ms,
            null_sentinels: file.defaults.null_sentinels,
            sources: file.sources,
        };
        config.validate()?;
        Ok(config)
    }

    /// Structural validation; any failure here aborts the run before any
    /// network or database work.
    fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(IngestError::config("no sources defined"));
        }

        for source in &self.sources {
            let name = &source.name;
            if name.trim().is_empty() {
                return Err(IngestError::config("source with empty name"));
            }
            if source.url.trim().is_empty() {
                return Err(IngestError::config(format!("source '{}': empty url", name)));
            }
            if source.schema.is_empty() {
                return Err(IngestError::config(format!(
                    "source '{}': schema must declare at least one field",
                    name
                )));
            }
            if !source.schema.contains_key(&source.primary_key) {
                return Err(IngestError::config(format!(
                    "source '{}': primary key '{}' is not in the schema",
                    name, source.primary_key
                )));
            }
            if !is_valid_identifier(&source.target_table) {
                return Err(IngestError::config(format!(
                    "source '{}': invalid table name '{}'",
                    name, source.target_table
                )));
            }
            for column in source.schema.keys() {
                if !is_valid_identifier(column) {
                    return Err(IngestError::config(format!(
                        "source '{}': invalid column name '{}'",
                        name, column
                    )));
                }
            }
            for field_rules in &source.rules {
                if field_rules.field.trim().is_empty() {
                    return Err(IngestError::config(format!(
                        "source '{}': rule entry without a field name",
                        name
                    )));
                }
            }
        }

        Ok(())
    }
}
