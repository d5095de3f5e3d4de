//! Global summary statistics and breakdown cross-checks

use std::collections::HashSet;

use crate::core::date::DateResolver;
use crate::core::types::{MonthBucket, OrderRecord, PeriodStats, QuantityStats, Summary, Verification};

pub(crate) fn summarize(records: &[OrderRecord], resolver: &DateResolver) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }

    let mut summary = Summary::default();
    let mut orders: HashSet<&str> = HashSet::new();

    for record in records {
        summary.total_rows += 1;
        summary.total_quantity = summary.total_quantity.saturating_add(record.item_quantity);

        let id = record.order_id.trim();
        if !id.is_empty() {
            orders.insert(id);
        }

        if let Some(date) = resolver.record_date(record) {
            summary.dated_rows += 1;
            summary.dated_quantity = summary.dated_quantity.saturating_add(record.item_quantity);
            summary.first_date = Some(summary.first_date.map_or(date, |d| d.min(date)));
            summary.last_date = Some(summary.last_date.map_or(date, |d| d.max(date)));
        }
    }

    summary.unique_orders = orders.len() as u64;
    summary.average_quantity = Some(summary.total_quantity as f64 / summary.total_rows as f64);
    summary.quantity_stats = quantity_stats(records);
    summary
}

/// Mean, population standard deviation (divide by N), min, max and median
pub(crate) fn quantity_stats(records: &[OrderRecord]) -> Option<QuantityStats> {
    if records.is_empty() {
        return None;
    }

    let mut values: Vec<u64> = records.iter().map(|r| r.item_quantity).collect();
    values.sort_unstable();

    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let variance = values
        .iter()
        .map(|&v| {
            let diff = v as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;

    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (values[mid - 1] as f64 + values[mid] as f64) / 2.0
    } else {
        values[mid] as f64
    };

    Some(QuantityStats {
        mean,
        std_dev: variance.sqrt(),
        min: values[0],
        max: values[values.len() - 1],
        median,
    })
}

/// The monthly breakdown must account for exactly the dated rows
pub(crate) fn verify_monthly(summary: &Summary, monthly: &[PeriodStats<MonthBucket>]) -> Verification {
    let breakdown_rows: u64 = monthly.iter().map(|p| p.tally.rows).sum();
    let breakdown_quantity: u64 = monthly.iter().map(|p| p.tally.quantity).sum();
    Verification {
        expected_rows: summary.dated_rows,
        expected_quantity: summary.dated_quantity,
        breakdown_rows,
        breakdown_quantity,
        consistent: breakdown_rows == summary.dated_rows
            && breakdown_quantity == summary.dated_quantity,
    }
}
