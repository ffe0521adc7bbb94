#![allow(dead_code)]

use chrono::NaiveDate;
pub use dcasim::domain::bar::DailyBar;
use dcasim::domain::error::DcasimError;
use dcasim::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<DailyBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<DailyBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyBar>, DcasimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcasimError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(symbol).cloned().unwrap_or_default();
        bars.retain(|b| {
            start_date.is_none_or(|s| b.date >= s) && end_date.is_none_or(|e| b.date <= e)
        });
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcasimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DcasimError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64, return_pct: Option<f64>) -> DailyBar {
    DailyBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000,
        return_pct,
    }
}

/// Daily bars compounding at a constant percent return, first return undefined.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64, daily_return: f64) -> Vec<DailyBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    let mut price = start_price;
    (0..count)
        .map(|i| {
            if i > 0 {
                price *= 1.0 + daily_return / 100.0;
            }
            DailyBar {
                date: start + chrono::Duration::days(i as i64),
                open: price,
                high: price,
                low: price,
                close: price,
                volume: 1000,
                return_pct: (i > 0).then_some(daily_return),
            }
        })
        .collect()
}
