//! Single-pass sales aggregation.
//!
//! Walks the records once, tracking the revenue leader, the unit-sales leader
//! and a per-year record count. Both leaders use a strict `>` comparison, so
//! the earliest record wins a tie. The most popular year breaks ties the same
//! way, by the year first seen in input order.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::currency::{NumericFormat, parse_price};
use crate::error::AggregateError;
use crate::records::CarRecord;

/// The record with the highest derived revenue, plus that revenue.
///
/// Revenue lives here rather than on the record, so the input is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueLeader<'a> {
    pub record: &'a CarRecord,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult<'a> {
    pub revenue_leader: RevenueLeader<'a>,
    pub sales_leader: &'a CarRecord,
    pub top_year: YearCount,
    /// Every model year with its record count, in first-seen order.
    pub year_counts: Vec<YearCount>,
}

/// Aggregates `records` into an [`AggregationResult`].
///
/// The first record seeds both leaders. That only matters when no record
/// produces a value above zero: it then stays the leader, same as any other tie.
///
/// # Errors
///
/// - [`AggregateError::EmptyInput`] if `records` is empty.
/// - [`AggregateError::Format`] for the first record whose price does not
///   parse under `format`. No partial result is returned.
pub fn aggregate<'a>(
    records: &'a [CarRecord],
    format: &NumericFormat,
) -> Result<AggregationResult<'a>, AggregateError> {
    let Some(first) = records.first() else {
        return Err(AggregateError::EmptyInput);
    };

    let mut revenue_leader = RevenueLeader {
        record: first,
        revenue: revenue_of(first, format)?,
    };
    let mut sales_leader = first;

    let mut year_counts: Vec<YearCount> = Vec::new();
    let mut year_index: HashMap<i32, usize> = HashMap::new();

    for (position, record) in records.iter().enumerate() {
        // The first record's revenue was computed while seeding.
        let revenue = if position == 0 {
            revenue_leader.revenue
        } else {
            revenue_of(record, format)?
        };
        trace!(id = %record.id, revenue, "Record revenue");

        if revenue > revenue_leader.revenue {
            revenue_leader = RevenueLeader { record, revenue };
        }

        if record.total_sales > sales_leader.total_sales {
            sales_leader = record;
        }

        let year = record.car.year;
        let slot = *year_index.entry(year).or_insert_with(|| {
            year_counts.push(YearCount { year, count: 0 });
            year_counts.len() - 1
        });
        year_counts[slot].count += 1;
    }

    let top_year = most_popular_year(&year_counts);

    debug!(
        records = records.len(),
        revenue_leader = %revenue_leader.record.id,
        sales_leader = %sales_leader.id,
        top_year = top_year.year,
        "Aggregation complete"
    );

    Ok(AggregationResult {
        revenue_leader,
        sales_leader,
        top_year,
        year_counts,
    })
}

fn revenue_of(record: &CarRecord, format: &NumericFormat) -> Result<f64, AggregateError> {
    let unit_price = parse_price(&record.price, format).map_err(|source| AggregateError::Format {
        id: record.id.clone(),
        source,
    })?;
    Ok(unit_price * record.total_sales as f64)
}

/// Highest count wins; among equal counts the earliest entry wins.
fn most_popular_year(year_counts: &[YearCount]) -> YearCount {
    let mut best = year_counts[0];
    for entry in &year_counts[1..] {
        if entry.count > best.count {
            best = *entry;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use proptest::prelude::*;

    const US: NumericFormat = NumericFormat::en_us();

    fn acme_records() -> Vec<CarRecord> {
        vec![
            CarRecord::new(1, "Acme", "X", 2020, "$10.00", 5),
            CarRecord::new(2, "Acme", "Y", 2020, "$100.00", 1),
            CarRecord::new(3, "Acme", "Z", 2019, "$5.00", 5),
        ]
    }

    #[test]
    fn test_acme_scenario() {
        let records = acme_records();
        let result = aggregate(&records, &US).unwrap();

        assert_eq!(result.revenue_leader.record.car.model, "Y");
        assert_eq!(result.revenue_leader.revenue, 100.0);
        assert_eq!(result.sales_leader.car.model, "X");
        assert_eq!(result.top_year, YearCount { year: 2020, count: 2 });
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            aggregate(&[], &US),
            Err(AggregateError::EmptyInput)
        ));
    }

    #[test]
    fn test_bad_price_aborts_pass() {
        let mut records = acme_records();
        records[2].price = "$5.0.0".to_string();

        match aggregate(&records, &US) {
            Err(AggregateError::Format { id, source }) => {
                assert_eq!(id.to_string(), "3");
                assert!(matches!(source, FormatError::InvalidNumber { .. }));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_revenue_tie_keeps_first() {
        let records = vec![
            CarRecord::new(1, "Acme", "A", 2020, "$10.00", 10),
            CarRecord::new(2, "Acme", "B", 2021, "$20.00", 5),
        ];
        let result = aggregate(&records, &US).unwrap();

        assert_eq!(result.revenue_leader.record.car.model, "A");
    }

    #[test]
    fn test_all_zero_sales_first_record_leads() {
        let records = vec![
            CarRecord::new(1, "Acme", "A", 2020, "$10.00", 0),
            CarRecord::new(2, "Acme", "B", 2021, "$20.00", 0),
        ];
        let result = aggregate(&records, &US).unwrap();

        assert_eq!(result.revenue_leader.record.car.model, "A");
        assert_eq!(result.revenue_leader.revenue, 0.0);
        assert_eq!(result.sales_leader.car.model, "A");
    }

    #[test]
    fn test_year_tie_picks_first_seen() {
        let records = vec![
            CarRecord::new(1, "Acme", "A", 2021, "$1.00", 1),
            CarRecord::new(2, "Acme", "B", 2019, "$1.00", 1),
            CarRecord::new(3, "Acme", "C", 2019, "$1.00", 1),
            CarRecord::new(4, "Acme", "D", 2021, "$1.00", 1),
        ];
        let result = aggregate(&records, &US).unwrap();

        assert_eq!(result.top_year, YearCount { year: 2021, count: 2 });
        assert_eq!(
            result.year_counts,
            vec![
                YearCount { year: 2021, count: 2 },
                YearCount { year: 2019, count: 2 },
            ]
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let records = acme_records();
        let before = records.clone();
        let _ = aggregate(&records, &US).unwrap();

        assert_eq!(records, before);
    }

    fn record_strategy() -> impl Strategy<Value = (i32, u32, u64)> {
        (2015i32..2025, 0u32..100_000, 0u64..1_000)
    }

    proptest! {
        #[test]
        fn prop_leaders_and_mode(rows in prop::collection::vec(record_strategy(), 1..40)) {
            let records: Vec<CarRecord> = rows
                .iter()
                .enumerate()
                .map(|(i, (year, cents, sales))| {
                    let price = format!("${}.{:02}", cents / 100, cents % 100);
                    CarRecord::new(i as i64, "Make", &format!("M{i}"), *year, &price, *sales)
                })
                .collect();

            let result = aggregate(&records, &US).unwrap();

            let revenues: Vec<f64> = records
                .iter()
                .map(|r| parse_price(&r.price, &US).unwrap() * r.total_sales as f64)
                .collect();

            // Revenue leader: correct value, maximal, earliest among ties.
            let leader_pos = records
                .iter()
                .position(|r| std::ptr::eq(r, result.revenue_leader.record))
                .unwrap();
            prop_assert_eq!(result.revenue_leader.revenue, revenues[leader_pos]);
            prop_assert!(revenues.iter().all(|r| *r <= result.revenue_leader.revenue));
            prop_assert!(revenues[..leader_pos].iter().all(|r| *r < result.revenue_leader.revenue));

            // Sales leader: maximal, earliest among ties.
            let sales_pos = records
                .iter()
                .position(|r| std::ptr::eq(r, result.sales_leader))
                .unwrap();
            let max_sales = records.iter().map(|r| r.total_sales).max().unwrap();
            prop_assert_eq!(result.sales_leader.total_sales, max_sales);
            prop_assert!(records[..sales_pos].iter().all(|r| r.total_sales < max_sales));

            // Mode: true maximum frequency, counts sum to input size.
            let mut freq: HashMap<i32, usize> = HashMap::new();
            for r in &records {
                *freq.entry(r.car.year).or_default() += 1;
            }
            prop_assert_eq!(result.top_year.count, *freq.values().max().unwrap());
            prop_assert_eq!(freq[&result.top_year.year], result.top_year.count);
            prop_assert_eq!(
                result.year_counts.iter().map(|y| y.count).sum::<usize>(),
                records.len()
            );
        }
    }
}
