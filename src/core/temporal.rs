//! Temporal aggregation: month and day buckets, specific-date lookups

use chrono::NaiveDate;
use std::collections::BTreeMap;

use tracing::debug;

use crate::core::date::DateResolver;
use crate::core::types::{
    CountryOrders, DateFilter, DateLookup, DaySnapshot, Dimension, MonthBucket, OrderRecord,
    PeriodStats, TallyAccumulator,
};

fn bucket_by<'a, K: Ord>(
    records: &'a [OrderRecord],
    key_of: impl Fn(&OrderRecord) -> Option<K>,
) -> Vec<PeriodStats<K>> {
    let mut buckets: BTreeMap<K, TallyAccumulator<'a>> = BTreeMap::new();
    let mut undated = 0usize;

    for record in records {
        match key_of(record) {
            Some(key) => buckets.entry(key).or_default().add(record),
            None => undated += 1,
        }
    }

    debug!(buckets = buckets.len(), undated, "bucketed records by date");

    buckets
        .into_iter()
        .map(|(bucket, acc)| PeriodStats {
            bucket,
            tally: acc.finish(),
        })
        .collect()
}

/// Month buckets over all years present, oldest first
pub(crate) fn aggregate_monthly(
    records: &[OrderRecord],
    resolver: &DateResolver,
) -> Vec<PeriodStats<MonthBucket>> {
    bucket_by(records, |r| resolver.month_of(r))
}

/// Day buckets over all years present, oldest first
pub(crate) fn aggregate_daily(
    records: &[OrderRecord],
    resolver: &DateResolver,
) -> Vec<PeriodStats<NaiveDate>> {
    bucket_by(records, |r| resolver.record_date(r))
}

/// Records whose resolved date passes `filter`; undated records never pass
pub(crate) fn filter_records(
    records: &[OrderRecord],
    resolver: &DateResolver,
    filter: &DateFilter,
) -> Vec<OrderRecord> {
    let kept: Vec<OrderRecord> = records
        .iter()
        .filter(|r| resolver.record_date(r).is_some_and(|date| filter.contains(date)))
        .cloned()
        .collect();
    debug!(kept = kept.len(), total = records.len(), "applied date filter");
    kept
}

/// Orders placed on exactly `target`, with the countries they ship to
pub(crate) fn orders_on(
    records: &[OrderRecord],
    resolver: &DateResolver,
    target: NaiveDate,
) -> DateLookup {
    let mut day = TallyAccumulator::default();
    let mut countries: BTreeMap<&str, TallyAccumulator> = BTreeMap::new();

    for record in records.iter().filter(|r| resolver.is_on(r, target)) {
        day.add(record);
        if let Some(country) = Dimension::Country.value_of(record) {
            countries.entry(country).or_default().add(record);
        }
    }

    let tally = day.finish();
    if tally.rows == 0 {
        return DateLookup::NoOrders { date: target };
    }

    DateLookup::Found(DaySnapshot {
        date: target,
        tally,
        countries: countries
            .into_iter()
            .map(|(country, acc)| {
                let t = acc.finish();
                CountryOrders {
                    country: country.to_string(),
                    unique_orders: t.unique_orders,
                    quantity: t.quantity,
                }
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rec(order_id: &str, qty: u64, date: &str) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            item_quantity: qty,
            order_date: date.to_string(),
            ..Default::default()
        }
    }

    fn scenario() -> Vec<OrderRecord> {
        vec![
            rec("A", 2, "2024-01-05"),
            rec("A", 3, "2024-01-05"),
            rec("B", 1, "2024-02-01"),
        ]
    }

    #[test]
    fn monthly_counts_unique_orders_and_items() {
        let months = aggregate_monthly(&scenario(), &DateResolver::default());
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].bucket.label(), "January 2024");
        assert_eq!(months[0].tally.unique_orders, 1);
        assert_eq!(months[0].tally.rows, 2);
        assert_eq!(months[0].tally.quantity, 5);
        assert_eq!(months[1].bucket.label(), "February 2024");
        assert_eq!(months[1].tally.unique_orders, 1);
        assert_eq!(months[1].tally.quantity, 1);
    }

    #[test]
    fn monthly_spans_years_in_order() {
        let records = vec![
            rec("1", 1, "2025-01-02"),
            rec("2", 1, "2023-11-30"),
            rec("3", 1, "2024-06-15T08:00:00+02:00"),
        ];
        let months = aggregate_monthly(&records, &DateResolver::default());
        let keys: Vec<_> = months.iter().map(|m| m.bucket.key()).collect();
        assert_eq!(keys, ["2023-11", "2024-06", "2025-01"]);
    }

    #[test]
    fn undated_records_are_skipped() {
        let mut records = scenario();
        records.push(rec("C", 9, "not-a-date"));
        records.push(rec("D", 4, ""));
        let months = aggregate_monthly(&records, &DateResolver::default());
        let total: u64 = months.iter().map(|m| m.tally.quantity).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn daily_buckets_sorted() {
        let days = aggregate_daily(&scenario(), &DateResolver::default());
        let keys: Vec<_> = days.iter().map(|p| p.bucket).collect();
        assert_eq!(keys, [d(2024, 1, 5), d(2024, 2, 1)]);
        assert_eq!(days[0].tally.rows, 2);
    }

    #[test]
    fn unique_orders_never_exceed_rows() {
        let records = vec![
            rec("A", 1, "2024-03-01"),
            rec("B", 1, "2024-03-01"),
            rec("A", 1, "2024-03-02"),
            rec("C", 1, "2024-04-01"),
        ];
        for p in aggregate_monthly(&records, &DateResolver::default()) {
            assert!(p.tally.unique_orders <= p.tally.rows);
        }
        let march = &aggregate_monthly(&records, &DateResolver::default())[0];
        assert_eq!(march.tally.rows, 3);
        assert_eq!(march.tally.unique_orders, 2);
    }

    #[test]
    fn year_filter_keeps_only_that_year() {
        let records = vec![
            rec("1", 1, "2023-12-31"),
            rec("2", 1, "2024-01-01"),
            rec("3", 1, "2024-07-09"),
            rec("4", 1, "not-a-date"),
        ];
        let resolver = DateResolver::default();
        let year = DateFilter {
            year: Some(2024),
            ..Default::default()
        };
        let kept = filter_records(&records, &resolver, &year);
        assert_eq!(aggregate_monthly(&kept, &resolver).len(), 2);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn mid_month_since_excludes_earlier_days_of_that_month() {
        let records = vec![
            rec("A", 10, "2024-03-01"),
            rec("B", 1, "2024-03-20"),
            rec("C", 2, "2024-04-02"),
            rec("D", 5, "2024-05-03"),
        ];
        let resolver = DateResolver::default();
        let range = DateFilter {
            since: Some(d(2024, 3, 15)),
            until: Some(d(2024, 5, 2)),
            year: None,
        };
        let months = aggregate_monthly(&filter_records(&records, &resolver, &range), &resolver);
        let keys: Vec<_> = months.iter().map(|m| m.bucket.key()).collect();
        assert_eq!(keys, ["2024-03", "2024-04"]);
        assert_eq!(months[0].tally.rows, 1);
        assert_eq!(months[0].tally.unique_orders, 1);
        assert_eq!(months[0].tally.quantity, 1);

        let days = aggregate_daily(&filter_records(&records, &resolver, &range), &resolver);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].bucket, d(2024, 3, 20));
    }

    #[test]
    fn specific_date_without_countries() {
        let lookup = orders_on(&scenario(), &DateResolver::default(), d(2024, 1, 5));
        let DateLookup::Found(snapshot) = lookup else {
            panic!("expected orders");
        };
        assert_eq!(snapshot.tally.rows, 2);
        assert_eq!(snapshot.tally.unique_orders, 1);
        assert_eq!(snapshot.tally.quantity, 5);
        assert!(snapshot.countries.is_empty());
    }

    #[test]
    fn specific_date_lists_countries() {
        let mut records = scenario();
        records[0].delivery_country = "DE".into();
        records[1].delivery_country = "AT".into();
        records.push(OrderRecord {
            delivery_country: "DE".into(),
            ..rec("Z", 4, "2024-01-05T09:00:00Z")
        });
        let DateLookup::Found(snapshot) = orders_on(&records, &DateResolver::default(), d(2024, 1, 5))
        else {
            panic!("expected orders");
        };
        let names: Vec<_> = snapshot.countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, ["AT", "DE"]);
        assert_eq!(snapshot.countries[1].unique_orders, 2);
        assert_eq!(snapshot.countries[1].quantity, 6);
    }

    #[test]
    fn specific_date_with_no_orders_is_explicit() {
        let lookup = orders_on(&scenario(), &DateResolver::default(), d(2025, 1, 1));
        assert_eq!(lookup, DateLookup::NoOrders { date: d(2025, 1, 1) });
    }

    #[test]
    fn empty_input() {
        let resolver = DateResolver::default();
        assert!(aggregate_monthly(&[], &resolver).is_empty());
        assert!(aggregate_daily(&[], &resolver).is_empty());
        assert!(matches!(
            orders_on(&[], &resolver, d(2024, 1, 1)),
            DateLookup::NoOrders { .. }
        ));
    }
}
