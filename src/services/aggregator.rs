//! Aggregator composing value extraction, time windowing, and reduction.
//!
//! Everything here is a pure function of (quantity type, entries, now) —
//! no hidden state, safe to memoize. See
//! [`TotalsCache`](crate::services::TotalsCache) for the caller-side memo.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::fmt;

use crate::services::repository::QuantityRepository;
use crate::types::{Entry, GroupedTotal, GroupingPeriod, QuantityType};

/// Computes current totals and grouped breakdowns for a quantity type.
pub struct QuantityAggregator;

impl QuantityAggregator {
    /// Current total: this type's entries, windowed by its aggregation
    /// period at `now`, reduced by its aggregation type.
    pub fn calculate_total<Tz: TimeZone>(
        quantity_type: &QuantityType,
        entries: &[Entry],
        now: &DateTime<Tz>,
    ) -> f64 {
        let own: Vec<Entry> = entries
            .iter()
            .filter(|entry| entry.quantity_type_id == quantity_type.id)
            .cloned()
            .collect();
        let windowed = quantity_type.aggregation_period.filter_entries(&own, now);
        let values: Vec<f64> = windowed.iter().map(|entry| entry.value).collect();
        quantity_type.aggregation_type.aggregate(&values)
    }

    /// Same total, with the window bound pushed down to the repository
    /// instead of filtering a loaded list. Produces identical results to
    /// [`calculate_total`] for any reference instant and entry set.
    ///
    /// [`calculate_total`]: QuantityAggregator::calculate_total
    pub fn total_from_repository<Tz: TimeZone>(
        repository: &dyn QuantityRepository,
        quantity_type: &QuantityType,
        now: &DateTime<Tz>,
    ) -> f64 {
        let since = quantity_type
            .aggregation_period
            .window_start(now)
            .map(|start| start.with_timezone(&Utc));
        let entries = repository.entries(quantity_type.id, since);
        let values: Vec<f64> = entries.iter().map(|entry| entry.value).collect();
        quantity_type.aggregation_type.aggregate(&values)
    }

    /// Historical breakdown: bucket this type's entries by the grouping
    /// period (a display-time choice, independent of the type's own
    /// window), aggregate each bucket, and sort newest-first.
    pub fn calculate_grouped_totals<Tz>(
        quantity_type: &QuantityType,
        entries: &[Entry],
        period: GroupingPeriod,
        tz: &Tz,
    ) -> Vec<GroupedTotal>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let own: Vec<&Entry> = entries
            .iter()
            .filter(|entry| entry.quantity_type_id == quantity_type.id)
            .collect();

        if period == GroupingPeriod::All {
            let values: Vec<f64> = own.iter().map(|entry| entry.value).collect();
            return vec![GroupedTotal {
                period_label: period.label(&DateTime::<Utc>::MIN_UTC),
                total: quantity_type.aggregation_type.aggregate(&values),
                count: own.len(),
                bucket_start: DateTime::<Utc>::MIN_UTC,
            }];
        }

        let mut buckets: HashMap<DateTime<Utc>, Vec<f64>> = HashMap::new();
        for entry in own {
            let local = entry.timestamp.with_timezone(tz);
            // degenerate calendar date: bucket the entry under its own timestamp
            let start = period.bucket_start(&local).unwrap_or(local);
            buckets
                .entry(start.with_timezone(&Utc))
                .or_default()
                .push(entry.value);
        }

        let mut totals: Vec<GroupedTotal> = buckets
            .into_iter()
            .map(|(start, values)| GroupedTotal {
                period_label: period.label(&start.with_timezone(tz)),
                total: quantity_type.aggregation_type.aggregate(&values),
                count: values.len(),
                bucket_start: start,
            })
            .collect();
        totals.sort_by(|a, b| b.bucket_start.cmp(&a.bucket_start));
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repository::InMemoryRepository;
    use crate::types::{AggregationPeriod, AggregationType, ValueFormat};
    use uuid::Uuid;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn entry_at(quantity_type_id: Uuid, timestamp: DateTime<Utc>, value: f64) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            value,
            timestamp,
            notes: String::new(),
            quantity_type_id,
        }
    }

    fn quantity(
        name: &str,
        format: ValueFormat,
        aggregation: AggregationType,
        period: AggregationPeriod,
    ) -> QuantityType {
        let mut qt = QuantityType::new(name, format);
        qt.aggregation_type = aggregation;
        qt.aggregation_period = period;
        qt
    }

    // ========== calculate_total ==========

    #[test]
    fn test_water_daily_sum_excludes_yesterday() {
        let water = quantity(
            "Water",
            ValueFormat::Decimal,
            AggregationType::Sum,
            AggregationPeriod::Daily,
        );
        let entries = vec![
            entry_at(water.id, utc(2026, 3, 15, 9, 0), 8.0),
            entry_at(water.id, utc(2026, 3, 14, 9, 0), 4.0),
        ];
        let now = utc(2026, 3, 15, 12, 0);
        assert_eq!(
            QuantityAggregator::calculate_total(&water, &entries, &now),
            8.0
        );
    }

    #[test]
    fn test_steps_all_time_average() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Average,
            AggregationPeriod::AllTime,
        );
        let entries = vec![
            entry_at(steps.id, utc(2026, 3, 10, 8, 0), 100.0),
            entry_at(steps.id, utc(2026, 3, 11, 8, 0), 200.0),
            entry_at(steps.id, utc(2026, 3, 12, 8, 0), 300.0),
        ];
        let now = utc(2026, 3, 15, 12, 0);
        assert_eq!(
            QuantityAggregator::calculate_total(&steps, &entries, &now),
            200.0
        );
    }

    #[test]
    fn test_total_ignores_other_quantity_types() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Sum,
            AggregationPeriod::AllTime,
        );
        let entries = vec![
            entry_at(steps.id, utc(2026, 3, 15, 9, 0), 100.0),
            entry_at(Uuid::new_v4(), utc(2026, 3, 15, 9, 0), 999.0),
        ];
        let now = utc(2026, 3, 15, 12, 0);
        assert_eq!(
            QuantityAggregator::calculate_total(&steps, &entries, &now),
            100.0
        );
    }

    #[test]
    fn test_total_of_empty_history_is_zero() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Sum,
            AggregationPeriod::Daily,
        );
        let now = utc(2026, 3, 15, 12, 0);
        assert_eq!(QuantityAggregator::calculate_total(&steps, &[], &now), 0.0);
    }

    #[test]
    fn test_repository_pushdown_matches_in_memory_total() {
        let water = quantity(
            "Water",
            ValueFormat::Decimal,
            AggregationType::Sum,
            AggregationPeriod::Weekly,
        );
        let entries = vec![
            entry_at(water.id, utc(2026, 3, 9, 7, 0), 8.0),  // Monday, this week
            entry_at(water.id, utc(2026, 3, 8, 22, 0), 4.0), // Sunday, last week
            entry_at(water.id, utc(2026, 2, 1, 9, 0), 2.0),
        ];
        let mut repo = InMemoryRepository::new();
        for entry in &entries {
            repo.insert_entry(entry.clone());
        }
        let now = utc(2026, 3, 11, 12, 0);

        let in_memory = QuantityAggregator::calculate_total(&water, &entries, &now);
        let pushed = QuantityAggregator::total_from_repository(&repo, &water, &now);
        assert_eq!(in_memory, 8.0);
        assert_eq!(pushed, in_memory);
    }

    // ========== calculate_grouped_totals ==========

    #[test]
    fn test_grouped_all_is_single_bucket_over_everything() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Sum,
            AggregationPeriod::Daily,
        );
        let entries = vec![
            entry_at(steps.id, utc(2026, 1, 1, 9, 0), 100.0),
            entry_at(steps.id, utc(2026, 2, 1, 9, 0), 200.0),
            entry_at(steps.id, utc(2026, 3, 1, 9, 0), 300.0),
        ];

        let grouped = QuantityAggregator::calculate_grouped_totals(
            &steps,
            &entries,
            GroupingPeriod::All,
            &Utc,
        );
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].period_label, "All Time");
        assert_eq!(grouped[0].count, 3);
        assert_eq!(grouped[0].total, 600.0);
    }

    #[test]
    fn test_grouped_all_on_empty_history() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Sum,
            AggregationPeriod::AllTime,
        );
        let grouped =
            QuantityAggregator::calculate_grouped_totals(&steps, &[], GroupingPeriod::All, &Utc);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].count, 0);
        assert_eq!(grouped[0].total, 0.0);
    }

    #[test]
    fn test_grouped_by_day_sorted_newest_first() {
        let water = quantity(
            "Water",
            ValueFormat::Decimal,
            AggregationType::Sum,
            AggregationPeriod::AllTime,
        );
        let entries = vec![
            entry_at(water.id, utc(2026, 3, 14, 9, 0), 4.0),
            entry_at(water.id, utc(2026, 3, 15, 9, 0), 8.0),
            entry_at(water.id, utc(2026, 3, 15, 18, 0), 2.0),
        ];

        let grouped = QuantityAggregator::calculate_grouped_totals(
            &water,
            &entries,
            GroupingPeriod::Day,
            &Utc,
        );
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].bucket_start, utc(2026, 3, 15, 0, 0));
        assert_eq!(grouped[0].total, 10.0);
        assert_eq!(grouped[0].count, 2);
        assert_eq!(grouped[0].period_label, "Mar 15, 2026");
        assert_eq!(grouped[1].bucket_start, utc(2026, 3, 14, 0, 0));
        assert_eq!(grouped[1].total, 4.0);
    }

    #[test]
    fn test_grouped_buckets_use_own_aggregation_type() {
        let pace = quantity(
            "Pace",
            ValueFormat::Decimal,
            AggregationType::Median,
            AggregationPeriod::AllTime,
        );
        let entries = vec![
            entry_at(pace.id, utc(2026, 3, 15, 8, 0), 1.0),
            entry_at(pace.id, utc(2026, 3, 15, 12, 0), 2.0),
            entry_at(pace.id, utc(2026, 3, 15, 18, 0), 9.0),
        ];

        let grouped = QuantityAggregator::calculate_grouped_totals(
            &pace,
            &entries,
            GroupingPeriod::Day,
            &Utc,
        );
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].total, 2.0); // median, not sum
    }

    #[test]
    fn test_grouped_by_week_label_and_bucket() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Sum,
            AggregationPeriod::AllTime,
        );
        // Wednesday 2026-01-07; its week starts Monday 2026-01-05
        let entries = vec![entry_at(steps.id, utc(2026, 1, 7, 9, 0), 500.0)];

        let grouped = QuantityAggregator::calculate_grouped_totals(
            &steps,
            &entries,
            GroupingPeriod::Week,
            &Utc,
        );
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].bucket_start, utc(2026, 1, 5, 0, 0));
        assert_eq!(grouped[0].period_label, "Jan 5 - Jan 11");
    }

    #[test]
    fn test_grouped_by_year_merges_months() {
        let steps = quantity(
            "Steps",
            ValueFormat::Integer,
            AggregationType::Sum,
            AggregationPeriod::AllTime,
        );
        let entries = vec![
            entry_at(steps.id, utc(2025, 2, 1, 9, 0), 100.0),
            entry_at(steps.id, utc(2025, 11, 1, 9, 0), 200.0),
            entry_at(steps.id, utc(2026, 1, 1, 9, 0), 50.0),
        ];

        let grouped = QuantityAggregator::calculate_grouped_totals(
            &steps,
            &entries,
            GroupingPeriod::Year,
            &Utc,
        );
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].period_label, "2026");
        assert_eq!(grouped[0].total, 50.0);
        assert_eq!(grouped[1].period_label, "2025");
        assert_eq!(grouped[1].total, 300.0);
    }

    #[test]
    fn test_grouped_respects_timezone_for_bucketing() {
        use chrono::FixedOffset;
        let water = quantity(
            "Water",
            ValueFormat::Decimal,
            AggregationType::Sum,
            AggregationPeriod::AllTime,
        );
        // 23:30 UTC on the 14th is already the 15th at +09:00
        let entries = vec![entry_at(water.id, utc(2026, 3, 14, 23, 30), 8.0)];
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();

        let grouped =
            QuantityAggregator::calculate_grouped_totals(&water, &entries, GroupingPeriod::Day, &tz);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].period_label, "Mar 15, 2026");
    }
}
