//! Calendar-month bucketing and investment-day selection.
//!
//! The simulator never assumes its input is sorted: bars are grouped by
//! (year, month) and sorted by date within each bucket, and buckets iterate
//! in chronological order.

use crate::domain::bar::DailyBar;
use chrono::Datelike;
use std::collections::BTreeMap;

/// A calendar year-month. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(bar: &DailyBar) -> Self {
        MonthKey {
            year: bar.date.year(),
            month: bar.date.month(),
        }
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// All bars of one calendar month, as indices into the source slice,
/// sorted by date ascending.
#[derive(Debug, Clone)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub indices: Vec<usize>,
}

/// Group bars into month buckets in chronological bucket order.
pub fn bucket_by_month(bars: &[DailyBar]) -> Vec<MonthBucket> {
    let mut grouped: BTreeMap<MonthKey, Vec<usize>> = BTreeMap::new();
    for (i, bar) in bars.iter().enumerate() {
        grouped.entry(MonthKey::of(bar)).or_default().push(i);
    }

    grouped
        .into_iter()
        .map(|(key, mut indices)| {
            indices.sort_by_key(|&i| bars[i].date);
            MonthBucket { key, indices }
        })
        .collect()
}

/// Select the investment day of a bucket: the first bar whose day-of-month is
/// `>= target_day`, or the last bar of the month when no such day traded.
/// Returns an index into the source slice. Buckets are never empty, so this
/// always selects exactly one day.
pub fn investment_index(bucket: &MonthBucket, bars: &[DailyBar], target_day: u32) -> usize {
    bucket
        .indices
        .iter()
        .copied()
        .find(|&i| bars[i].day_of_month() >= target_day)
        .unwrap_or_else(|| *bucket.indices.last().expect("month bucket is non-empty"))
}
