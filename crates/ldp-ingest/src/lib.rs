//! LDP Ingest Library
//!
//! The collaborators around the pure core: YAML pipeline configuration,
//! the paginated API reader, the PostgreSQL loader, and the per-source
//! orchestration driving fetch -> partition -> load.
//!
//! # Example
//!
//! ```no_run
//! use ldp_ingest::{config::PipelineConfig, run::run_pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::load("config/sources.yml")?;
//!     run_pipeline(&config, false).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod load;
pub mod run;

pub use error::{IngestError, Result};
