//! Plain-text context block handed to the question-answering model
//!
//! The text is read verbatim by a language model, so everything here is
//! deterministic: fixed section order, `en` digit grouping, one-decimal shares.

use std::fmt::Write;

use crate::core::{
    CrossKind, DateLookup, DateResolver, Dimension, OrderRecord, aggregate_cross,
    aggregate_dimension, aggregate_monthly, find_date_in_text, orders_on, summarize, top_n,
};
use crate::consts::NO_DATA;
use crate::output::format::{NumberFormat, format_decimal, format_number, format_percent};

const RANKED: [(Dimension, &str); 4] = [
    (Dimension::Marketplace, "TOP MARKETPLACES"),
    (Dimension::Country, "TOP DELIVERY COUNTRIES"),
    (Dimension::Product, "TOP PRODUCTS"),
    (Dimension::Attribute, "TOP ATTRIBUTES"),
];

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "=== {title} ===");
}

fn write_summary(out: &mut String, records: &[OrderRecord], resolver: &DateResolver, nf: NumberFormat) {
    let summary = summarize(records, resolver);
    section(out, "ORDER DATA SUMMARY");
    let _ = writeln!(out, "Total rows: {}", format_number(summary.total_rows, nf));
    let _ = writeln!(out, "Unique orders: {}", format_number(summary.unique_orders, nf));
    let _ = writeln!(out, "Total items: {}", format_number(summary.total_quantity, nf));
    if let Some(avg) = summary.average_quantity {
        let _ = writeln!(out, "Average items per row: {}", format_decimal(avg, 2, nf));
    }
    if let Some(stats) = &summary.quantity_stats {
        let _ = writeln!(
            out,
            "Items per row: std dev {} (population), median {}, min {}, max {}",
            format_decimal(stats.std_dev, 2, nf),
            format_decimal(stats.median, 1, nf),
            format_number(stats.min, nf),
            format_number(stats.max, nf),
        );
    }
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        let _ = writeln!(out, "Date range: {first} to {last}");
    }
    let _ = writeln!(
        out,
        "Rows with a valid date: {} of {}",
        format_number(summary.dated_rows, nf),
        format_number(summary.total_rows, nf)
    );
}

fn write_monthly(out: &mut String, records: &[OrderRecord], resolver: &DateResolver, nf: NumberFormat) {
    section(out, "MONTHLY BREAKDOWN");
    let monthly = aggregate_monthly(records, resolver);
    if monthly.is_empty() {
        let _ = writeln!(out, "No dated orders.");
    }
    for p in &monthly {
        let _ = writeln!(
            out,
            "{}: {} unique orders, {} items",
            p.bucket.label(),
            format_number(p.tally.unique_orders, nf),
            format_number(p.tally.quantity, nf)
        );
    }
}

fn write_rankings(out: &mut String, records: &[OrderRecord], top: usize, nf: NumberFormat) {
    for (dimension, title) in RANKED {
        section(out, title);
        let groups = top_n(aggregate_dimension(records, dimension), Some(top));
        if groups.is_empty() {
            let _ = writeln!(out, "No {} recorded.", dimension.label().to_lowercase());
        }
        for (i, g) in groups.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {}: {} units ({}), {} orders",
                i + 1,
                g.value,
                format_number(g.quantity, nf),
                format_percent(g.percentage, nf),
                format_number(g.unique_orders, nf)
            );
        }
    }
}

fn write_cross(out: &mut String, records: &[OrderRecord], resolver: &DateResolver, nf: NumberFormat) {
    let kind = CrossKind::MonthMarketplace;
    section(out, &kind.title().to_uppercase());
    let cross = aggregate_cross(records, resolver, kind);
    if cross.rows.is_empty() {
        let _ = writeln!(out, "No dated orders with a marketplace.");
    }
    for row in &cross.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| format!("{} {} units", c.value, format_number(c.tally.quantity, nf)))
            .collect();
        let _ = writeln!(out, "{}: {}", row.label, cells.join(", "));
    }
}

fn write_date_lookup(out: &mut String, lookup: &DateLookup, nf: NumberFormat) {
    match lookup {
        DateLookup::NoOrders { date } => {
            section(out, &format!("ORDERS ON {date}"));
            let _ = writeln!(out, "No orders found for {date}.");
        }
        DateLookup::Found(day) => {
            section(out, &format!("ORDERS ON {}", day.date));
            let _ = writeln!(
                out,
                "Rows: {}, unique orders: {}, items: {}",
                format_number(day.tally.rows, nf),
                format_number(day.tally.unique_orders, nf),
                format_number(day.tally.quantity, nf)
            );
            if day.countries.is_empty() {
                let _ = writeln!(out, "Delivery countries: none recorded");
            } else {
                let names: Vec<&str> = day.countries.iter().map(|c| c.country.as_str()).collect();
                let _ = writeln!(
                    out,
                    "Delivery countries ({}): {}",
                    names.len(),
                    names.join(", ")
                );
                for c in &day.countries {
                    let _ = writeln!(
                        out,
                        "- {}: {} orders, {} items",
                        c.country,
                        format_number(c.unique_orders, nf),
                        format_number(c.quantity, nf)
                    );
                }
            }
        }
    }
}

/// Render the full context block. An empty dataset yields only the no-data line
/// (and the question, if any).
pub(crate) fn render_context(
    records: &[OrderRecord],
    resolver: &DateResolver,
    question: Option<&str>,
    top: usize,
) -> String {
    let nf = NumberFormat::default();
    let mut out = String::new();

    if records.is_empty() {
        let _ = writeln!(out, "{NO_DATA}");
    } else {
        write_summary(&mut out, records, resolver, nf);
        write_monthly(&mut out, records, resolver, nf);
        write_rankings(&mut out, records, top, nf);
        write_cross(&mut out, records, resolver, nf);
        if let Some(date) = question.and_then(find_date_in_text) {
            write_date_lookup(&mut out, &orders_on(records, resolver, date), nf);
        }
    }

    if let Some(q) = question.map(str::trim).filter(|q| !q.is_empty()) {
        section(&mut out, "QUESTION");
        let _ = writeln!(out, "{q}");
    }
    out
}
