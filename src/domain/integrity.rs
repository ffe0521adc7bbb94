//! Date-continuity integrity checking.
//!
//! Standalone diagnostic over a daily series: finds calendar gaps between
//! consecutive rows and duplicate dates. Gaps are informational (weekends,
//! holidays, source outages); duplicates indicate a corrupt file. The
//! simulator does not consult this — it runs from the `check` command.

use crate::domain::bar::DailyBar;
use chrono::NaiveDate;

/// A run of calendar days with no data between two recorded rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DateGap {
    pub before: NaiveDate,
    pub after: NaiveDate,
    pub missing_days: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub gaps: Vec<DateGap>,
    pub duplicates: Vec<NaiveDate>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty()
    }

    pub fn missing_day_total(&self) -> i64 {
        self.gaps.iter().map(|g| g.missing_days).sum()
    }
}

/// Scan a series for gaps and duplicates. Input order does not matter; the
/// scan works over a date-sorted view.
pub fn check_series(bars: &[DailyBar]) -> IntegrityReport {
    let mut dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
    dates.sort();

    let mut gaps = Vec::new();
    let mut duplicates = Vec::new();

    for pair in dates.windows(2) {
        let diff = (pair[1] - pair[0]).num_days();
        if diff == 0 {
            if duplicates.last() != Some(&pair[0]) {
                duplicates.push(pair[0]);
            }
        } else if diff > 1 {
            gaps.push(DateGap {
                before: pair[0],
                after: pair[1],
                missing_days: diff - 1,
            });
        }
    }

    IntegrityReport {
        total_records: bars.len(),
        start: dates.first().copied(),
        end: dates.last().copied(),
        gaps,
        duplicates,
    }
}
