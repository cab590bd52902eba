//! LDP Common Library
//!
//! Shared infrastructure for the LDP workspace. Currently this is the
//! centralized logging setup used by the ingest binary; anything needed by
//! more than one workspace member belongs here.
//!
//! # Example
//!
//! ```no_run
//! use ldp_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
