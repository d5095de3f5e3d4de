//! CSV ingestion from local files and glob patterns

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use super::Source;
use crate::core::RawRow;
use crate::error::AppError;

pub(crate) const DEFAULT_DELIMITER: u8 = b',';

/// Parse a delimiter option: a single ASCII char, or "tab" / "\t"
pub(crate) fn parse_delimiter(raw: &str) -> Result<u8, AppError> {
    match raw {
        "\\t" | "\t" => return Ok(b'\t'),
        s if s.eq_ignore_ascii_case("tab") => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(AppError::InvalidDelimiter {
            input: raw.to_string(),
        }),
    }
}

/// Read CSV with a header row into rows keyed by header cell
pub(crate) fn rows_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRow>, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    // exports in legacy encodings still load; bad bytes become U+FFFD
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| {
                (
                    header.clone(),
                    Value::String(String::from_utf8_lossy(field).into_owned()),
                )
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn is_pattern(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Expand a path or glob pattern; matches are sorted for a stable row order
pub(crate) fn expand_input(input: &str) -> Result<Vec<PathBuf>, AppError> {
    if !is_pattern(input) {
        return Ok(vec![PathBuf::from(input)]);
    }

    let entries = glob::glob(input).map_err(|e| AppError::InvalidPattern {
        pattern: input.to_string(),
        reason: e.to_string(),
    })?;
    let mut paths: Vec<PathBuf> = entries.flatten().filter(|p| p.is_file()).collect();
    paths.sort();

    if paths.is_empty() {
        warn!(pattern = input, "no files match input pattern");
    }
    Ok(paths)
}

pub(crate) struct CsvFileSource {
    inputs: Vec<String>,
    delimiter: u8,
}

impl CsvFileSource {
    pub(crate) fn new(inputs: Vec<String>, delimiter: u8) -> Self {
        Self { inputs, delimiter }
    }
}

impl Source for CsvFileSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn location(&self) -> String {
        self.inputs.join(", ")
    }

    fn load(&self) -> Result<Vec<RawRow>, AppError> {
        let mut rows = Vec::new();
        for input in &self.inputs {
            for path in expand_input(input)? {
                let file = File::open(&path).map_err(|source| AppError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                let file_rows = rows_from_reader(file, self.delimiter)?;
                debug!(path = %path.display(), rows = file_rows.len(), "read csv file");
                rows.extend(file_rows);
            }
        }
        Ok(rows)
    }
}
