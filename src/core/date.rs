//! Date resolution for free-text order dates
//!
//! Unparsable dates are not errors: the record simply drops out of every
//! date-based aggregation.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::core::types::{MonthBucket, OrderRecord};
use crate::utils::Timezone;

/// Formats that carry a time and an offset, tried after RFC 3339
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Date-only formats tried last, in order
const GENERIC_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%Y%m%d",
];

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateResolver {
    timezone: Timezone,
}

impl DateResolver {
    pub(crate) fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }

    pub(crate) fn resolve(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(self.timezone.date_of(dt));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(self.timezone.date_of(dt));
            }
        }

        if let Some(prefix) = s.get(..10)
            && let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        {
            return Some(d);
        }

        parse_generic(s)
    }

    pub(crate) fn record_date(&self, record: &OrderRecord) -> Option<NaiveDate> {
        self.resolve(&record.order_date)
    }

    pub(crate) fn month_of(&self, record: &OrderRecord) -> Option<MonthBucket> {
        self.record_date(record).map(|d| MonthBucket {
            year: d.year(),
            month: d.month(),
        })
    }

    pub(crate) fn is_on(&self, record: &OrderRecord, target: NaiveDate) -> bool {
        self.record_date(record) == Some(target)
    }
}

/// Parse a caller-supplied calendar date ("2024-12-31", "December 31, 2024", ...)
pub(crate) fn parse_generic(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    GENERIC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Find the first calendar date mentioned in free text, e.g. a user question
pub(crate) fn find_date_in_text(text: &str) -> Option<NaiveDate> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| matches!(c, '?' | '!' | '(' | ')' | '"' | '\'')))
        .collect();
    for start in 0..words.len() {
        for len in [3, 1] {
            let Some(window) = words.get(start..start + len) else {
                continue;
            };
            let candidate = window.join(" ");
            let candidate = candidate.trim_end_matches(['.', ',', ';', ':']);
            if let Some(d) = parse_generic(candidate) {
                return Some(d);
            }
        }
    }
    None
}
