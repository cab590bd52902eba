//! Pipeline orchestration
//!
//! Runs every configured source through fetch -> partition -> load,
//! sequentially. A failing source is logged and counted; the remaining
//! sources still run. Nothing here retries; a rerun is safe because the
//! core is deterministic and the loader upserts by primary key.

use crate::config::{PipelineConfig, SourceConfig};
use crate::error::{IngestError, Result};
use crate::fetch::ApiReader;
use crate::load::Loader;
use ldp_core::{Normalizer, Pipeline};
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Per-source outcome counts
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceStats {
    /// Records fetched before deduplication
    pub input: usize,
    /// Records accepted by validation
    pub valid: usize,
    /// Records rejected by validation
    pub rejected: usize,
    /// Rows written to the staging table
    pub loaded: u64,
}

/// Run the full pipeline over every configured source.
///
/// With `init_db` set, staging tables are dropped and recreated first.
pub async fn run_pipeline(config: &PipelineConfig, init_db: bool) -> Result<()> {
    let pipeline_start = Instant::now();

    let loader = Loader::connect(&config.db_url).await?;
    if init_db {
        loader.init_db(&config.sources).await?;
    }

    let reader = ApiReader::new(Duration::from_millis(config.request_delay_ms))?;

    info!(sources = config.sources.len(), "pipeline started");

    let mut totals = SourceStats::default();
    let mut succeeded = 0usize;
    let mut failed = 0usize;

    for source in &config.sources {
        let source_start = Instant::now();

        match ingest_source(&reader, &loader, config, source).await {
            Ok(stats) => {
                succeeded += 1;
                totals.input += stats.input;
                totals.valid += stats.valid;
                totals.rejected += stats.rejected;
                totals.loaded += stats.loaded;

                info!(
                    source = %source.name,
                    input = stats.input,
                    valid = stats.valid,
                    rejected = stats.rejected,
                    loaded = stats.loaded,
                    duration_secs = source_start.elapsed().as_secs_f64(),
                    "source complete"
                );
            },
            Err(err) => {
                failed += 1;
                error!(
                    source = %source.name,
                    error = %err,
                    duration_secs = source_start.elapsed().as_secs_f64(),
                    "source failed"
                );
            },
        }
    }

    let status = if failed == 0 {
        "SUCCESS"
    } else if succeeded > 0 {
        "PARTIAL"
    } else {
        "FAILED"
    };

    info!(
        input = totals.input,
        valid = totals.valid,
        rejected = totals.rejected,
        loaded = totals.loaded,
        sources_succeeded = succeeded,
        sources_failed = failed,
        duration_secs = pipeline_start.elapsed().as_secs_f64(),
        status,
        "pipeline summary"
    );

    Ok(())
}

/// Fetch, partition, and load one source
async fn ingest_source(
    reader: &ApiReader,
    loader: &Loader,
    config: &PipelineConfig,
    source: &SourceConfig,
) -> Result<SourceStats> {
    let batch = reader
        .fetch(&source.url, source.pages_or(config.pages))
        .await;
    if batch.is_empty() {
        return Err(IngestError::source(&source.name, "no records fetched"));
    }

    let pipeline = Pipeline::new(
        Normalizer::new(&config.null_sentinels),
        source.schema.clone(),
        source.rules.clone(),
        source.primary_key.clone(),
    );
    let result = pipeline.partition(&batch);

    info!(
        source = %source.name,
        input = batch.len(),
        valid = result.accepted.len(),
        rejected = result.rejected.len(),
        "batch partitioned"
    );

    let loaded = loader
        .upsert(
            &source.target_table,
            &source.schema,
            &source.primary_key,
            &result.accepted,
        )
        .await?;
    loader.insert_rejects(&source.name, &result.rejected).await?;

    Ok(SourceStats {
        input: batch.len(),
        valid: result.accepted.len(),
        rejected: result.rejected.len(),
        loaded,
    })
}
