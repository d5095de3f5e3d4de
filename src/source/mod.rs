//! Ingestion layer
//!
//! Each source turns one external location (CSV files, a JSON rows file, an HTTP
//! CSV endpoint, a SQLite table) into loosely-typed rows. Normalization into
//! `OrderRecord` happens afterwards, in one place.

pub(crate) mod csv;
pub(crate) mod http;
pub(crate) mod json;
pub(crate) mod loader;
pub(crate) mod registry;
pub(crate) mod sqlite;

use crate::core::RawRow;
use crate::error::AppError;

/// Ingestion source trait - implemented once per external location kind
pub(crate) trait Source {
    /// Short kind name used in logs ("csv", "http", ...)
    fn name(&self) -> &'static str;

    /// Where the rows come from, for diagnostics
    fn location(&self) -> String;

    /// Fetch every row. Per-row anomalies are left to the normalizer.
    fn load(&self) -> Result<Vec<RawRow>, AppError>;
}

/// Box type for dynamic dispatch
pub(crate) type BoxedSource = Box<dyn Source>;

pub(crate) use loader::{LoadResult, load_records};
pub(crate) use registry::{SourceOptions, build_sources};
pub(crate) use sqlite::{DEFAULT_TABLE, save_records};
