use serde::Serialize;
use serde_json::{Value, json};

use crate::core::{
    CrossKind, CrossTable, DateLookup, Dimension, GroupShare, PeriodStats, Summary, Verification,
};
use crate::error::AppError;
use crate::output::period::PeriodKey;

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn output_summary_json(
    summary: &Summary,
    verification: &Verification,
) -> Result<String, AppError> {
    to_pretty(&json!({
        "summary": summary,
        "verification": verification,
    }))
}

pub(crate) fn output_period_json<K: PeriodKey>(
    periods: &[PeriodStats<K>],
) -> Result<String, AppError> {
    let key = K::PERIOD.label();
    let output: Vec<Value> = periods
        .iter()
        .map(|p| {
            json!({
                key: p.bucket.key(),
                "label": p.bucket.label(),
                "rows": p.tally.rows,
                "unique_orders": p.tally.unique_orders,
                "quantity": p.tally.quantity,
            })
        })
        .collect();
    to_pretty(&output)
}

pub(crate) fn output_breakdown_json(
    dimension: Dimension,
    groups: &[GroupShare],
) -> Result<String, AppError> {
    to_pretty(&json!({
        "dimension": dimension.label().to_lowercase(),
        "groups": groups,
    }))
}

pub(crate) fn output_cross_json(kind: CrossKind, cross: &CrossTable) -> Result<String, AppError> {
    to_pretty(&json!({
        "title": kind.title(),
        "outer": cross.outer_label.to_lowercase(),
        "inner": cross.inner_label.to_lowercase(),
        "rows": cross.rows,
    }))
}

pub(crate) fn output_lookup_json(lookup: &DateLookup) -> Result<String, AppError> {
    to_pretty(lookup)
}
