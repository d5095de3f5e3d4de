//! Source registry
//!
//! Turns command-line/config options into the ordered list of sources to load.

use std::path::PathBuf;

use super::BoxedSource;
use super::csv::{CsvFileSource, DEFAULT_DELIMITER};
use super::http::HttpCsvSource;
use super::json::JsonRowsSource;
use super::sqlite::{DEFAULT_TABLE, SqliteSource, validate_table};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub(crate) struct SourceOptions {
    pub(crate) rows: Option<PathBuf>,
    pub(crate) inputs: Vec<String>,
    pub(crate) url: Option<String>,
    pub(crate) database: Option<PathBuf>,
    pub(crate) table: String,
    pub(crate) delimiter: u8,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            rows: None,
            inputs: Vec::new(),
            url: None,
            database: None,
            table: DEFAULT_TABLE.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Build sources in fixed order: JSON rows, CSV files, HTTP, database
pub(crate) fn build_sources(options: &SourceOptions) -> Result<Vec<BoxedSource>, AppError> {
    let mut sources: Vec<BoxedSource> = Vec::new();

    if let Some(path) = &options.rows {
        sources.push(Box::new(JsonRowsSource::new(path.clone())));
    }
    if !options.inputs.is_empty() {
        sources.push(Box::new(CsvFileSource::new(
            options.inputs.clone(),
            options.delimiter,
        )));
    }
    if let Some(url) = &options.url {
        sources.push(Box::new(HttpCsvSource::new(url.clone(), options.delimiter)));
    }
    if let Some(db) = &options.database {
        validate_table(&options.table)?;
        sources.push(Box::new(SqliteSource::new(db.clone(), options.table.clone())));
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_build_nothing() {
        assert!(build_sources(&SourceOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn sources_follow_fixed_order() {
        let options = SourceOptions {
            rows: Some("rows.json".into()),
            inputs: vec!["a.csv".into()],
            url: Some("http://localhost/export.csv".into()),
            database: Some("orders.db".into()),
            ..Default::default()
        };
        let names: Vec<_> = build_sources(&options)
            .unwrap()
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, ["json", "csv", "http", "sqlite"]);
    }

    #[test]
    fn bad_table_rejected_up_front() {
        let options = SourceOptions {
            database: Some("orders.db".into()),
            table: "orders--".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_sources(&options),
            Err(AppError::InvalidTable { .. })
        ));
    }
}
