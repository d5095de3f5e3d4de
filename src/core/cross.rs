//! Two-level breakdowns (month × marketplace, marketplace × country, ...)
//!
//! A record only lands in a cell when both of its dimensions are present.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::core::aggregator::compare_ranked;
use crate::core::date::DateResolver;
use crate::core::types::{
    CrossCell, CrossRow, CrossTable, Dimension, MonthBucket, OrderRecord, TallyAccumulator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CrossKind {
    MonthMarketplace,
    MonthCountry,
    MarketplaceCountry,
    AttributeMarketplace,
}

impl CrossKind {
    #[cfg(test)]
    pub(crate) const ALL: [CrossKind; 4] = [
        CrossKind::MonthMarketplace,
        CrossKind::MonthCountry,
        CrossKind::MarketplaceCountry,
        CrossKind::AttributeMarketplace,
    ];

    /// Outer key is a calendar month, so date filters apply
    pub(crate) fn is_monthly(self) -> bool {
        matches!(self, CrossKind::MonthMarketplace | CrossKind::MonthCountry)
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            CrossKind::MonthMarketplace => "Monthly Sales by Marketplace",
            CrossKind::MonthCountry => "Monthly Sales by Country",
            CrossKind::MarketplaceCountry => "Marketplace Sales by Country",
            CrossKind::AttributeMarketplace => "Attribute Sales by Marketplace",
        }
    }
}

/// Outer key of a breakdown row
trait OuterKey: Ord {
    fn key(&self) -> String;
    fn label(&self) -> String;
}

impl OuterKey for MonthBucket {
    fn key(&self) -> String {
        MonthBucket::key(self)
    }

    fn label(&self) -> String {
        MonthBucket::label(self)
    }
}

impl OuterKey for &str {
    fn key(&self) -> String {
        (*self).to_string()
    }

    fn label(&self) -> String {
        (*self).to_string()
    }
}

struct OuterAccumulator<'a> {
    total: TallyAccumulator<'a>,
    cells: HashMap<&'a str, TallyAccumulator<'a>>,
}

impl Default for OuterAccumulator<'_> {
    fn default() -> Self {
        Self {
            total: TallyAccumulator::default(),
            cells: HashMap::new(),
        }
    }
}

/// Build rows keyed by `outer_of`, outer rows in key order
fn build_rows<'a, K: OuterKey>(
    records: &'a [OrderRecord],
    outer_of: impl Fn(&'a OrderRecord) -> Option<K>,
    inner: Dimension,
) -> Vec<CrossRow> {
    let mut outer: BTreeMap<K, OuterAccumulator<'a>> = BTreeMap::new();
    let mut excluded = 0usize;

    for record in records {
        let (Some(key), Some(value)) = (outer_of(record), inner.value_of(record)) else {
            excluded += 1;
            continue;
        };
        let acc = outer.entry(key).or_default();
        acc.total.add(record);
        acc.cells.entry(value).or_default().add(record);
    }

    debug!(rows = outer.len(), excluded, "built cross breakdown");

    outer
        .into_iter()
        .map(|(key, acc)| {
            let mut cells: Vec<(&str, TallyAccumulator)> = acc.cells.into_iter().collect();
            cells.sort_by(|(ak, a), (bk, b)| compare_ranked(ak, a.quantity(), bk, b.quantity()));
            CrossRow {
                outer: key.key(),
                label: key.label(),
                total: acc.total.finish(),
                cells: cells
                    .into_iter()
                    .map(|(value, cell)| CrossCell {
                        value: value.to_string(),
                        tally: cell.finish(),
                    })
                    .collect(),
            }
        })
        .collect()
}

fn by_month(
    records: &[OrderRecord],
    resolver: &DateResolver,
    inner: Dimension,
) -> Vec<CrossRow> {
    build_rows(records, |r| resolver.month_of(r), inner)
}

/// Categorical outer key: rows ranked by total quantity like inner cells
fn by_dimension(records: &[OrderRecord], outer: Dimension, inner: Dimension) -> Vec<CrossRow> {
    let mut rows = build_rows(records, |r| outer.value_of(r), inner);
    rows.sort_by(|a, b| compare_ranked(&a.outer, a.total.quantity, &b.outer, b.total.quantity));
    rows
}

pub(crate) fn aggregate_cross(
    records: &[OrderRecord],
    resolver: &DateResolver,
    kind: CrossKind,
) -> CrossTable {
    let (outer_label, inner_label, rows) = match kind {
        CrossKind::MonthMarketplace => (
            "Month",
            Dimension::Marketplace.label(),
            by_month(records, resolver, Dimension::Marketplace),
        ),
        CrossKind::MonthCountry => (
            "Month",
            Dimension::Country.label(),
            by_month(records, resolver, Dimension::Country),
        ),
        CrossKind::MarketplaceCountry => (
            Dimension::Marketplace.label(),
            Dimension::Country.label(),
            by_dimension(records, Dimension::Marketplace, Dimension::Country),
        ),
        CrossKind::AttributeMarketplace => (
            Dimension::Attribute.label(),
            Dimension::Marketplace.label(),
            by_dimension(records, Dimension::Attribute, Dimension::Marketplace),
        ),
    };
    CrossTable {
        outer_label,
        inner_label,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, qty: u64, date: &str, marketplace: &str, country: &str) -> OrderRecord {
        OrderRecord {
            order_id: id.to_string(),
            item_quantity: qty,
            order_date: date.to_string(),
            marketplace: marketplace.to_string(),
            delivery_country: country.to_string(),
            ..Default::default()
        }
    }

    fn records() -> Vec<OrderRecord> {
        vec![
            rec("A", 2, "2024-01-05", "Amazon", "DE"),
            rec("A", 3, "2024-01-05", "Amazon", "DE"),
            rec("B", 1, "2024-01-20", "eBay", "FR"),
            rec("C", 4, "2024-02-01", "eBay", ""),
            rec("D", 6, "bad", "Etsy", "DE"),
            rec("E", 8, "2024-02-03", "", "AT"),
        ]
    }

    #[test]
    fn month_by_marketplace() {
        let table = aggregate_cross(&records(), &DateResolver::default(), CrossKind::MonthMarketplace);
        assert_eq!(table.outer_label, "Month");
        assert_eq!(table.inner_label, "Marketplace");
        assert_eq!(table.rows.len(), 2);

        let jan = &table.rows[0];
        assert_eq!(jan.outer, "2024-01");
        assert_eq!(jan.label, "January 2024");
        assert_eq!(jan.total.quantity, 6);
        assert_eq!(jan.cells[0].value, "Amazon");
        assert_eq!(jan.cells[0].tally.quantity, 5);
        assert_eq!(jan.cells[0].tally.unique_orders, 1);
        assert_eq!(jan.cells[1].value, "eBay");

        // record with no marketplace does not contribute
        let feb = &table.rows[1];
        assert_eq!(feb.total.quantity, 4);
        assert_eq!(feb.cells.len(), 1);
    }

    #[test]
    fn month_by_country_skips_missing_country() {
        let table = aggregate_cross(&records(), &DateResolver::default(), CrossKind::MonthCountry);
        let feb = &table.rows[1];
        assert_eq!(feb.cells.len(), 1);
        assert_eq!(feb.cells[0].value, "AT");
        assert_eq!(feb.total.quantity, 8);
    }

    #[test]
    fn marketplace_by_country_ranks_outer_by_quantity() {
        let table =
            aggregate_cross(&records(), &DateResolver::default(), CrossKind::MarketplaceCountry);
        let outer: Vec<_> = table.rows.iter().map(|r| r.outer.as_str()).collect();
        // undated record still counts here; eBay row only has the FR cell
        assert_eq!(outer, ["Etsy", "Amazon", "eBay"]);
        assert_eq!(table.rows[2].total.quantity, 1);
    }

    #[test]
    fn row_totals_match_cells() {
        let resolver = DateResolver::default();
        for kind in CrossKind::ALL {
            let table = aggregate_cross(&records(), &resolver, kind);
            for row in &table.rows {
                let q: u64 = row.cells.iter().map(|c| c.tally.quantity).sum();
                let n: u64 = row.cells.iter().map(|c| c.tally.rows).sum();
                assert_eq!(q, row.total.quantity);
                assert_eq!(n, row.total.rows);
            }
        }
    }

    #[test]
    fn attribute_by_marketplace() {
        let mut rs = records();
        rs[0].attribute = "Red".into();
        rs[2].attribute = "Blue".into();
        rs[3].attribute = "Blue".into();
        let table =
            aggregate_cross(&rs, &DateResolver::default(), CrossKind::AttributeMarketplace);
        let outer: Vec<_> = table.rows.iter().map(|r| r.outer.as_str()).collect();
        assert_eq!(outer, ["Blue", "Red"]);
        assert_eq!(table.rows[0].cells[0].value, "eBay");
        assert_eq!(table.rows[0].cells[0].tally.quantity, 5);
    }

    #[test]
    fn empty_input() {
        for kind in CrossKind::ALL {
            assert!(aggregate_cross(&[], &DateResolver::default(), kind).rows.is_empty());
        }
    }

    #[test]
    fn only_month_kinds_take_date_filters() {
        let monthly: Vec<CrossKind> = CrossKind::ALL.into_iter().filter(|k| k.is_monthly()).collect();
        assert_eq!(monthly, [CrossKind::MonthMarketplace, CrossKind::MonthCountry]);
    }
}
