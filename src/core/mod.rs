//! Core module - the order aggregation engine
//!
//! Everything here is a pure function over an in-memory record slice.

mod aggregator;
mod cross;
mod date;
mod normalizer;
mod summary;
mod temporal;
mod types;

pub(crate) use aggregator::{aggregate_dimension, top_n};
pub(crate) use cross::{CrossKind, aggregate_cross};
pub(crate) use date::{DateResolver, find_date_in_text, parse_generic};
pub(crate) use normalizer::{RawRow, normalize_rows, rows_from_value};
pub(crate) use summary::{summarize, verify_monthly};
pub(crate) use temporal::{aggregate_daily, aggregate_monthly, filter_records, orders_on};
pub(crate) use types::{
    CrossTable, DateFilter, DateLookup, Dimension, GroupShare, MonthBucket, OrderRecord,
    PeriodStats, Summary, Verification,
};
