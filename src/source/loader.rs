//! Unified loader: pull rows from every configured source, then normalize once

use std::time::Instant;

use tracing::{debug, info};

use super::BoxedSource;
use crate::core::{OrderRecord, normalize_rows};
use crate::error::AppError;

#[derive(Debug, Default)]
pub(crate) struct LoadResult {
    pub(crate) records: Vec<OrderRecord>,
    /// Raw rows fetched across all sources
    pub(crate) rows: usize,
    pub(crate) elapsed_ms: f64,
}

/// Load all sources in order. Rows are concatenated in source order; the first
/// failing source aborts the load.
pub(crate) fn load_records(sources: &[BoxedSource]) -> Result<LoadResult, AppError> {
    if sources.is_empty() {
        return Err(AppError::NoSource);
    }

    let start = Instant::now();
    let mut rows = Vec::new();
    for source in sources {
        let source_start = Instant::now();
        let loaded = source.load()?;
        debug!(
            source = source.name(),
            location = %source.location(),
            rows = loaded.len(),
            elapsed_ms = source_start.elapsed().as_secs_f64() * 1000.0,
            "loaded source"
        );
        rows.extend(loaded);
    }

    let records = normalize_rows(&rows);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        sources = sources.len(),
        rows = rows.len(),
        elapsed_ms,
        "loaded order records"
    );

    Ok(LoadResult {
        records,
        rows: rows.len(),
        elapsed_ms,
    })
}
