use crate::core::{CrossTable, Dimension, GroupShare, PeriodStats};
use crate::error::AppError;
use crate::output::period::PeriodKey;

type CsvWriter = ::csv::Writer<Vec<u8>>;

fn writer() -> CsvWriter {
    ::csv::WriterBuilder::new().from_writer(Vec::new())
}

fn finish(writer: CsvWriter) -> Result<String, AppError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub(crate) fn output_period_csv<K: PeriodKey>(periods: &[PeriodStats<K>]) -> Result<String, AppError> {
    let mut out = writer();
    out.write_record([K::PERIOD.label(), "rows", "unique_orders", "quantity"])?;
    for p in periods {
        out.write_record([
            p.bucket.key(),
            p.tally.rows.to_string(),
            p.tally.unique_orders.to_string(),
            p.tally.quantity.to_string(),
        ])?;
    }
    finish(out)
}

pub(crate) fn output_breakdown_csv(
    dimension: Dimension,
    groups: &[GroupShare],
) -> Result<String, AppError> {
    let mut out = writer();
    let label = dimension.label().to_lowercase();
    out.write_record([label.as_str(), "rows", "unique_orders", "quantity", "percentage"])?;
    for g in groups {
        out.write_record([
            g.value.clone(),
            g.count.to_string(),
            g.unique_orders.to_string(),
            g.quantity.to_string(),
            format!("{:.1}", g.percentage),
        ])?;
    }
    finish(out)
}

/// One line per cell; outer subtotals are left to the consumer
pub(crate) fn output_cross_csv(cross: &CrossTable) -> Result<String, AppError> {
    let mut out = writer();
    let outer = cross.outer_label.to_lowercase();
    let inner = cross.inner_label.to_lowercase();
    out.write_record([
        outer.as_str(),
        inner.as_str(),
        "rows",
        "unique_orders",
        "quantity",
    ])?;
    for row in &cross.rows {
        for cell in &row.cells {
            out.write_record([
                row.outer.clone(),
                cell.value.clone(),
                cell.tally.rows.to_string(),
                cell.tally.unique_orders.to_string(),
                cell.tally.quantity.to_string(),
            ])?;
        }
    }
    finish(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CrossKind, DateResolver, OrderRecord, aggregate_cross, aggregate_dimension,
        aggregate_monthly,
    };

    fn records() -> Vec<OrderRecord> {
        let r = |id: &str, qty: u64, date: &str, mp: &str| OrderRecord {
            order_id: id.into(),
            item_quantity: qty,
            order_date: date.into(),
            marketplace: mp.into(),
            ..Default::default()
        };
        vec![
            r("A", 2, "2024-01-05", "Amazon, EU"),
            r("A", 3, "2024-01-05", "Amazon, EU"),
            r("B", 1, "2024-02-01", "eBay"),
        ]
    }

    #[test]
    fn period_csv_rows() {
        let monthly = aggregate_monthly(&records(), &DateResolver::default());
        let out = output_period_csv(&monthly).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "month,rows,unique_orders,quantity");
        assert_eq!(lines[1], "2024-01,2,1,5");
        assert_eq!(lines[2], "2024-02,1,1,1");
    }

    #[test]
    fn breakdown_csv_quotes_values() {
        let groups = aggregate_dimension(&records(), Dimension::Marketplace);
        let out = output_breakdown_csv(Dimension::Marketplace, &groups).unwrap();
        assert!(out.starts_with("marketplace,rows,unique_orders,quantity,percentage\n"));
        assert!(out.contains("\"Amazon, EU\",2,1,5,83.3\n"));
        assert!(out.contains("eBay,1,1,1,16.7\n"));
    }

    #[test]
    fn cross_csv_uses_month_keys() {
        let cross = aggregate_cross(&records(), &DateResolver::default(), CrossKind::MonthMarketplace);
        let out = output_cross_csv(&cross).unwrap();
        assert!(out.starts_with("month,marketplace,"));
        assert!(out.contains("2024-02,eBay,1,1,1"));
    }
}
