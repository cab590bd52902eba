//! LDP - Library data ingestion pipeline

use anyhow::Result;
use clap::Parser;
use ldp_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use ldp_ingest::config::PipelineConfig;
use ldp_ingest::run::run_pipeline;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ldp")]
#[command(author, version, about = "Batch ETL pipeline for book-metadata APIs")]
struct Cli {
    /// Path to the YAML pipeline configuration
    #[arg(short, long, default_value = "config/sources.yml")]
    config: PathBuf,

    /// Drop and recreate staging tables before running
    #[arg(long)]
    init_db: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Environment variables win over the CLI defaults
    let mut log_config = LogConfig::from_env()?;
    if std::env::var("LOG_OUTPUT").is_err() {
        log_config.output = LogOutput::Both;
    }
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config)?;

    let config = PipelineConfig::load(&cli.config)?;
    info!(
        config = %cli.config.display(),
        sources = config.sources.len(),
        "configuration loaded"
    );

    run_pipeline(&config, cli.init_db).await?;

    info!("ingestion complete");
    Ok(())
}
