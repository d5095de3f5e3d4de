//! JSON rows file: a top-level array of row objects

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use super::Source;
use crate::core::{RawRow, rows_from_value};
use crate::error::AppError;

pub(crate) struct JsonRowsSource {
    path: PathBuf,
}

impl JsonRowsSource {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Source for JsonRowsSource {
    fn name(&self) -> &'static str {
        "json"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<RawRow>, AppError> {
        let file = File::open(&self.path).map_err(|source| AppError::Io {
            path: self.location(),
            source,
        })?;
        let value = serde_json::from_reader(BufReader::new(file))?;
        rows_from_value(value)
    }
}
