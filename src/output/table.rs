use comfy_table::{Cell, Color, Table};

use crate::core::{
    CrossKind, CrossTable, DateLookup, Dimension, GroupShare, PeriodStats, Summary, Verification,
};
use crate::output::format::{
    NumberFormat, create_styled_table, format_decimal, format_number, format_percent,
    header_cell, right_cell, styled_cell,
};
use crate::output::period::{Period, PeriodKey};

#[derive(Debug, Clone, Copy)]
pub(crate) struct TableOptions {
    pub(crate) use_color: bool,
    pub(crate) number_format: NumberFormat,
}

impl TableOptions {
    fn accent(&self) -> Option<Color> {
        self.use_color.then_some(Color::Cyan)
    }

    fn share(&self) -> Option<Color> {
        self.use_color.then_some(Color::Green)
    }
}

/// Print the load line with timing
pub(crate) fn print_load_line(rows: usize, elapsed_ms: f64, options: TableOptions) {
    let text = format!(
        "{} rows loaded",
        format_number(rows as u64, options.number_format)
    );
    if options.use_color {
        println!("\n  {text} | \x1b[36m{elapsed_ms:.0}ms\x1b[0m\n");
    } else {
        println!("\n  {text} | {elapsed_ms:.0}ms\n");
    }
}

fn print_titled(title: &str, table: &Table) {
    println!("\n  {title}\n");
    println!("{table}");
}

fn metric_row(table: &mut Table, label: &str, value: String) {
    table.add_row(vec![Cell::new(label), right_cell(&value, None, false)]);
}

pub(crate) fn build_summary_table(summary: &Summary, options: TableOptions) -> Table {
    let nf = options.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Metric", options.use_color),
        header_cell("Value", options.use_color),
    ]);

    metric_row(&mut table, "Rows", format_number(summary.total_rows, nf));
    metric_row(&mut table, "Unique orders", format_number(summary.unique_orders, nf));
    metric_row(&mut table, "Total quantity", format_number(summary.total_quantity, nf));
    metric_row(
        &mut table,
        "Average quantity per row",
        summary
            .average_quantity
            .map_or_else(|| "N/A".to_string(), |v| format_decimal(v, 2, nf)),
    );

    let date = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "N/A".to_string(), |d| d.to_string());
    metric_row(&mut table, "First order date", date(summary.first_date));
    metric_row(&mut table, "Last order date", date(summary.last_date));
    metric_row(
        &mut table,
        "Rows with a date",
        format!(
            "{} of {}",
            format_number(summary.dated_rows, nf),
            format_number(summary.total_rows, nf)
        ),
    );

    if let Some(stats) = &summary.quantity_stats {
        metric_row(&mut table, "Quantity std dev", format_decimal(stats.std_dev, 2, nf));
        metric_row(&mut table, "Quantity median", format_decimal(stats.median, 1, nf));
        metric_row(
            &mut table,
            "Quantity min / max",
            format!("{} / {}", format_number(stats.min, nf), format_number(stats.max, nf)),
        );
    }
    table
}

pub(crate) fn print_summary_table(
    summary: &Summary,
    verification: &Verification,
    options: TableOptions,
) {
    print_titled("Order Summary", &build_summary_table(summary, options));
    if !verification.consistent {
        let nf = options.number_format;
        println!(
            "\n  Warning: monthly breakdown covers {} rows / {} items, expected {} / {}",
            format_number(verification.breakdown_rows, nf),
            format_number(verification.breakdown_quantity, nf),
            format_number(verification.expected_rows, nf),
            format_number(verification.expected_quantity, nf),
        );
    }
}

pub(crate) fn build_period_table<K: PeriodKey>(
    periods: &[PeriodStats<K>],
    options: TableOptions,
) -> Table {
    let c = options.use_color;
    let nf = options.number_format;
    let mut table = create_styled_table();
    let label = match K::PERIOD {
        Period::Day => "Date",
        Period::Month => "Month",
    };
    table.set_header(vec![
        header_cell(label, c),
        header_cell("Rows", c),
        header_cell("Orders", c),
        header_cell("Quantity", c),
    ]);

    let (mut rows, mut orders, mut quantity) = (0u64, 0u64, 0u64);
    for period in periods {
        rows += period.tally.rows;
        orders += period.tally.unique_orders;
        quantity += period.tally.quantity;
        table.add_row(vec![
            Cell::new(period.bucket.label()),
            right_cell(&format_number(period.tally.rows, nf), None, false),
            right_cell(&format_number(period.tally.unique_orders, nf), None, false),
            right_cell(&format_number(period.tally.quantity, nf), None, false),
        ]);
    }

    // orders summed per period: an order spanning two periods counts twice
    let accent = options.accent();
    table.add_row(vec![
        styled_cell("TOTAL", accent, true),
        right_cell(&format_number(rows, nf), accent, true),
        right_cell(&format_number(orders, nf), accent, true),
        right_cell(&format_number(quantity, nf), accent, true),
    ]);
    table
}

pub(crate) fn print_period_table<K: PeriodKey>(periods: &[PeriodStats<K>], options: TableOptions) {
    print_titled(K::PERIOD.title(), &build_period_table(periods, options));
}

pub(crate) fn build_breakdown_table(
    dimension: Dimension,
    groups: &[GroupShare],
    options: TableOptions,
) -> Table {
    let c = options.use_color;
    let nf = options.number_format;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("#", c),
        header_cell(dimension.label(), c),
        header_cell("Rows", c),
        header_cell("Orders", c),
        header_cell("Quantity", c),
        header_cell("Share", c),
    ]);

    for (rank, group) in groups.iter().enumerate() {
        table.add_row(vec![
            right_cell(&(rank + 1).to_string(), None, false),
            Cell::new(&group.value),
            right_cell(&format_number(group.count, nf), None, false),
            right_cell(&format_number(group.unique_orders, nf), None, false),
            right_cell(&format_number(group.quantity, nf), None, false),
            right_cell(&format_percent(group.percentage, nf), options.share(), false),
        ]);
    }
    table
}

pub(crate) fn print_breakdown_table(
    dimension: Dimension,
    groups: &[GroupShare],
    options: TableOptions,
) {
    let title = format!("Orders by {}", dimension.label());
    print_titled(&title, &build_breakdown_table(dimension, groups, options));
}

pub(crate) fn build_cross_table(cross: &CrossTable, options: TableOptions) -> Table {
    let c = options.use_color;
    let nf = options.number_format;
    let accent = options.accent();
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell(cross.outer_label, c),
        header_cell(cross.inner_label, c),
        header_cell("Rows", c),
        header_cell("Orders", c),
        header_cell("Quantity", c),
    ]);

    for row in &cross.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            table.add_row(vec![
                Cell::new(if i == 0 { row.label.as_str() } else { "" }),
                Cell::new(&cell.value),
                right_cell(&format_number(cell.tally.rows, nf), None, false),
                right_cell(&format_number(cell.tally.unique_orders, nf), None, false),
                right_cell(&format_number(cell.tally.quantity, nf), None, false),
            ]);
        }
        table.add_row(vec![
            Cell::new(""),
            styled_cell("Subtotal", accent, true),
            right_cell(&format_number(row.total.rows, nf), accent, true),
            right_cell(&format_number(row.total.unique_orders, nf), accent, true),
            right_cell(&format_number(row.total.quantity, nf), accent, true),
        ]);
    }
    table
}

pub(crate) fn print_cross_table(kind: CrossKind, cross: &CrossTable, options: TableOptions) {
    if cross.rows.is_empty() {
        println!("No rows carry both {} and {}.", cross.outer_label, cross.inner_label);
        return;
    }
    print_titled(kind.title(), &build_cross_table(cross, options));
}

pub(crate) fn print_date_lookup(lookup: &DateLookup, options: TableOptions) {
    let nf = options.number_format;
    let snapshot = match lookup {
        DateLookup::NoOrders { date } => {
            println!("No orders found for {date}");
            return;
        }
        DateLookup::Found(snapshot) => snapshot,
    };

    println!(
        "\n  Orders on {}: {} rows, {} unique orders, {} items\n",
        snapshot.date,
        format_number(snapshot.tally.rows, nf),
        format_number(snapshot.tally.unique_orders, nf),
        format_number(snapshot.tally.quantity, nf),
    );
    if snapshot.countries.is_empty() {
        println!("  No delivery country recorded for these orders.");
        return;
    }

    let c = options.use_color;
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Country", c),
        header_cell("Orders", c),
        header_cell("Quantity", c),
    ]);
    for country in &snapshot.countries {
        table.add_row(vec![
            Cell::new(&country.country),
            right_cell(&format_number(country.unique_orders, nf), None, false),
            right_cell(&format_number(country.quantity, nf), None, false),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        DateResolver, OrderRecord, aggregate_cross, aggregate_dimension, aggregate_monthly,
        summarize,
    };

    fn options() -> TableOptions {
        TableOptions {
            use_color: false,
            number_format: NumberFormat::default(),
        }
    }

    fn records() -> Vec<OrderRecord> {
        let r = |id: &str, qty: u64, date: &str, mp: &str| OrderRecord {
            order_id: id.into(),
            item_quantity: qty,
            order_date: date.into(),
            marketplace: mp.into(),
            delivery_country: "DE".into(),
            ..Default::default()
        };
        vec![
            r("A", 2, "2024-01-05", "Amazon"),
            r("A", 3, "2024-01-05", "Amazon"),
            r("B", 1, "2024-02-01", "eBay"),
        ]
    }

    #[test]
    fn breakdown_table_shows_shares() {
        let groups = aggregate_dimension(&records(), Dimension::Marketplace);
        let text = build_breakdown_table(Dimension::Marketplace, &groups, options()).to_string();
        assert!(text.contains("Amazon"));
        assert!(text.contains("83.3%"));
        assert!(text.contains("16.7%"));
    }

    #[test]
    fn period_table_labels_months_and_totals() {
        let monthly = aggregate_monthly(&records(), &DateResolver::default());
        let text = build_period_table(&monthly, options()).to_string();
        assert!(text.contains("January 2024"));
        assert!(text.contains("February 2024"));
        assert!(text.contains("TOTAL"));
    }

    #[test]
    fn summary_table_lists_metrics() {
        let summary = summarize(&records(), &DateResolver::default());
        let text = build_summary_table(&summary, options()).to_string();
        assert!(text.contains("Unique orders"));
        assert!(text.contains("2024-01-05"));
        assert!(text.contains("3 of 3"));
    }

    #[test]
    fn cross_table_has_subtotals() {
        let cross = aggregate_cross(
            &records(),
            &DateResolver::default(),
            CrossKind::MarketplaceCountry,
        );
        let text = build_cross_table(&cross, options()).to_string();
        assert!(text.contains("Subtotal"));
        assert!(text.contains("eBay"));
    }
}
