//! Single-dimension aggregation
//!
//! Groups records by one categorical field and ranks the groups by summed quantity.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::core::types::{Dimension, GroupShare, OrderRecord, TallyAccumulator};

/// Ranking order used everywhere: quantity descending, then key ascending
pub(crate) fn compare_ranked(a_key: &str, a_qty: u64, b_key: &str, b_qty: u64) -> Ordering {
    b_qty.cmp(&a_qty).then_with(|| a_key.cmp(b_key))
}

/// Round to one decimal place
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / total * 100`, one decimal; 0 when the total is 0
pub(crate) fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

/// Group by `dimension`, skipping records whose value is empty
pub(crate) fn aggregate_dimension(records: &[OrderRecord], dimension: Dimension) -> Vec<GroupShare> {
    let mut groups: HashMap<&str, TallyAccumulator> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        match dimension.value_of(record) {
            Some(value) => groups.entry(value).or_default().add(record),
            None => skipped += 1,
        }
    }

    debug!(
        dimension = dimension.label(),
        groups = groups.len(),
        skipped,
        "aggregated dimension"
    );

    let mut ranked: Vec<(&str, TallyAccumulator)> = groups.into_iter().collect();
    ranked.sort_by(|(ak, a), (bk, b)| compare_ranked(ak, a.quantity(), bk, b.quantity()));

    let total: u64 = ranked.iter().map(|(_, acc)| acc.quantity()).sum();

    ranked
        .into_iter()
        .map(|(value, acc)| {
            let tally = acc.finish();
            GroupShare {
                value: value.to_string(),
                count: tally.rows,
                unique_orders: tally.unique_orders,
                quantity: tally.quantity,
                percentage: percentage(tally.quantity, total),
            }
        })
        .collect()
}

/// Keep the first `n` groups; `None` keeps all
pub(crate) fn top_n(mut groups: Vec<GroupShare>, n: Option<usize>) -> Vec<GroupShare> {
    if let Some(n) = n {
        groups.truncate(n);
    }
    groups
}
