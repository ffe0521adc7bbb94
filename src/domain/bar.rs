//! Daily OHLCV bar representation.

use chrono::{Datelike, NaiveDate};

/// One trading day of an instrument. `return_pct` is the percent change of
/// close over the previous close as supplied by the data source; it is `None`
/// when undefined (the first record of a series, or a source gap).
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub return_pct: Option<f64>,
}

impl DailyBar {
    /// Calendar day-of-month of this bar (1-31).
    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }
}
