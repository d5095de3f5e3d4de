//! Core data types shared by the ingestion layer and every aggregator
//!
//! All sources normalize into `OrderRecord`; every aggregator returns one of the
//! serializable result types below.

use chrono::{Month, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// One line item of a sales order, after normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct OrderRecord {
    /// Not unique: line items of the same order share it
    pub(crate) order_id: String,
    pub(crate) item_quantity: u64,
    /// Free text, resolved lazily by `DateResolver`
    pub(crate) order_date: String,
    pub(crate) variation_name: String,
    pub(crate) attribute: String,
    pub(crate) marketplace: String,
    pub(crate) delivery_country: String,
    pub(crate) variation_number: String,
}

/// Categorical field used as a grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dimension {
    Attribute,
    Marketplace,
    Country,
    Product,
    Variation,
}

impl Dimension {
    #[cfg(test)]
    pub(crate) const ALL: [Dimension; 5] = [
        Dimension::Attribute,
        Dimension::Marketplace,
        Dimension::Country,
        Dimension::Product,
        Dimension::Variation,
    ];

    /// Trimmed value of this dimension, `None` when empty
    pub(crate) fn value_of(self, record: &OrderRecord) -> Option<&str> {
        let raw = match self {
            Dimension::Attribute => &record.attribute,
            Dimension::Marketplace => &record.marketplace,
            Dimension::Country => &record.delivery_country,
            Dimension::Product => &record.variation_name,
            Dimension::Variation => &record.variation_number,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Dimension::Attribute => "Attribute",
            Dimension::Marketplace => "Marketplace",
            Dimension::Country => "Country",
            Dimension::Product => "Product",
            Dimension::Variation => "Variation",
        }
    }
}

/// Row count, distinct orders and summed quantity for one group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct Tally {
    pub(crate) rows: u64,
    pub(crate) unique_orders: u64,
    pub(crate) quantity: u64,
}

/// Accumulates a `Tally` while tracking distinct order ids
#[derive(Debug, Default)]
pub(crate) struct TallyAccumulator<'a> {
    rows: u64,
    quantity: u64,
    orders: HashSet<&'a str>,
}

impl<'a> TallyAccumulator<'a> {
    pub(crate) fn add(&mut self, record: &'a OrderRecord) {
        self.rows += 1;
        self.quantity = self.quantity.saturating_add(record.item_quantity);
        let id = record.order_id.trim();
        if !id.is_empty() {
            self.orders.insert(id);
        }
    }

    pub(crate) fn quantity(&self) -> u64 {
        self.quantity
    }

    pub(crate) fn finish(self) -> Tally {
        Tally {
            rows: self.rows,
            unique_orders: self.orders.len() as u64,
            quantity: self.quantity,
        }
    }
}

/// One ranked value of a single-dimension breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct GroupShare {
    pub(crate) value: String,
    pub(crate) count: u64,
    pub(crate) unique_orders: u64,
    pub(crate) quantity: u64,
    /// Share of the dimension's total quantity, one decimal
    pub(crate) percentage: f64,
}

/// Calendar month bucket, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct MonthBucket {
    pub(crate) year: i32,
    pub(crate) month: u32,
}

impl MonthBucket {
    /// Sortable key, e.g. "2024-01"
    pub(crate) fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human label, e.g. "January 2024"
    pub(crate) fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        format!("{name} {}", self.year)
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

/// A temporal bucket with its tally
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PeriodStats<K> {
    pub(crate) bucket: K,
    #[serde(flatten)]
    pub(crate) tally: Tally,
}

/// Per-country slice of a specific-date lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CountryOrders {
    pub(crate) country: String,
    pub(crate) unique_orders: u64,
    pub(crate) quantity: u64,
}

/// Everything known about one calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct DaySnapshot {
    pub(crate) date: NaiveDate,
    #[serde(flatten)]
    pub(crate) tally: Tally,
    /// Sorted by country name; empty when no row names a country
    pub(crate) countries: Vec<CountryOrders>,
}

/// Result of a specific-date lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum DateLookup {
    Found(DaySnapshot),
    NoOrders { date: NaiveDate },
}

/// Inner cell of a two-level breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CrossCell {
    pub(crate) value: String,
    #[serde(flatten)]
    pub(crate) tally: Tally,
}

/// One outer key of a two-level breakdown with its ranked inner cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CrossRow {
    pub(crate) outer: String,
    pub(crate) label: String,
    /// Rows and quantity sum over `cells`; unique orders are distinct across them
    pub(crate) total: Tally,
    pub(crate) cells: Vec<CrossCell>,
}

/// Two-level breakdown, outer rows in their defined order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CrossTable {
    pub(crate) outer_label: &'static str,
    pub(crate) inner_label: &'static str,
    pub(crate) rows: Vec<CrossRow>,
}

/// Descriptive statistics over the item quantity distribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct QuantityStats {
    pub(crate) mean: f64,
    /// Population standard deviation (divides by N)
    pub(crate) std_dev: f64,
    pub(crate) min: u64,
    pub(crate) max: u64,
    pub(crate) median: f64,
}

/// Global descriptive statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct Summary {
    pub(crate) total_rows: u64,
    pub(crate) total_quantity: u64,
    pub(crate) unique_orders: u64,
    /// `None` when there are no rows
    pub(crate) average_quantity: Option<f64>,
    pub(crate) first_date: Option<NaiveDate>,
    pub(crate) last_date: Option<NaiveDate>,
    pub(crate) dated_rows: u64,
    pub(crate) dated_quantity: u64,
    pub(crate) quantity_stats: Option<QuantityStats>,
}

/// Outcome of checking a breakdown against the summary totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Verification {
    pub(crate) expected_rows: u64,
    pub(crate) expected_quantity: u64,
    pub(crate) breakdown_rows: u64,
    pub(crate) breakdown_quantity: u64,
    pub(crate) consistent: bool,
}

/// Inclusive date filter applied to records before temporal rollups
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateFilter {
    pub(crate) since: Option<NaiveDate>,
    pub(crate) until: Option<NaiveDate>,
    pub(crate) year: Option<i32>,
}

impl DateFilter {
    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        if let Some(y) = self.year
            && date.year() != y
        {
            return false;
        }
        if let Some(s) = self.since
            && date < s
        {
            return false;
        }
        if let Some(u) = self.until
            && date > u
        {
            return false;
        }
        true
    }

    /// True when any bound is set
    pub(crate) fn is_active(&self) -> bool {
        self.since.is_some() || self.until.is_some() || self.year.is_some()
    }
}
