//! CSV file data adapter.
//!
//! Reads daily series from `{symbol}_daily.csv` files and writes the
//! augmented output series. Columns are resolved by header name, so files
//! from different pipeline stages (extra derived columns, variant names for
//! the percent-return column) are accepted as-is.

use crate::domain::bar::DailyBar;
use crate::domain::error::DcasimError;
use crate::domain::run::SimulationRun;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::path::{Path, PathBuf};

/// Header variants under which the percent daily return appears; the first
/// is what this tool writes, the last is what the upstream source emits.
const RETURN_HEADERS: [&str; 3] = ["return_pct", "change_pct", "涨跌幅(%)"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}_daily.csv", symbol))
    }

    /// Read one daily-series CSV file in full.
    pub fn read_file(path: &Path) -> Result<Vec<DailyBar>, DcasimError> {
        let mut rdr = csv::Reader::from_path(path).map_err(|e| DcasimError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let headers = rdr
            .headers()
            .map_err(|e| DcasimError::Data {
                reason: format!("failed to read headers of {}: {}", path.display(), e),
            })?
            .clone();

        let columns = Columns::resolve(&headers)?;
        let mut bars = Vec::new();

        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| DcasimError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            bars.push(columns.parse_bar(&record, row)?);
        }

        Ok(bars)
    }

    /// Write the augmented output series: the input columns followed by the
    /// base DCA columns, then the leveraged columns.
    pub fn write_augmented(run: &SimulationRun, path: &Path) -> Result<(), DcasimError> {
        let mut wtr = csv::Writer::from_path(path).map_err(|e| DcasimError::Data {
            reason: format!("failed to create {}: {}", path.display(), e),
        })?;

        wtr.write_record([
            "date",
            "open",
            "high",
            "low",
            "close",
            "volume",
            "return_pct",
            "monthly_investment",
            "shares_bought",
            "cumulative_investment",
            "cumulative_shares",
            "portfolio_value",
            "leveraged_return_pct",
            "leveraged_close",
            "leveraged_monthly_investment",
            "leveraged_shares_bought",
            "leveraged_cumulative_investment",
            "leveraged_cumulative_shares",
            "leveraged_portfolio_value",
        ])
        .map_err(|e| write_error(path, e))?;

        for (i, bar) in run.bars.iter().enumerate() {
            let base = &run.base[i];
            let lev = &run.leveraged[i];
            wtr.write_record([
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
                optional_to_string(bar.return_pct),
                base.contribution.to_string(),
                base.shares_bought.to_string(),
                base.cumulative_invested.to_string(),
                base.cumulative_shares.to_string(),
                base.portfolio_value.to_string(),
                optional_to_string(run.leveraged_series.returns_pct[i]),
                run.leveraged_series.closes[i].to_string(),
                lev.contribution.to_string(),
                lev.shares_bought.to_string(),
                lev.cumulative_invested.to_string(),
                lev.cumulative_shares.to_string(),
                lev.portfolio_value.to_string(),
            ])
            .map_err(|e| write_error(path, e))?;
        }

        wtr.flush().map_err(DcasimError::Io)
    }
}

fn write_error(path: &Path, e: csv::Error) -> DcasimError {
    DcasimError::Data {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

fn optional_to_string(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Resolved column positions for one file's header row.
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    return_pct: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DcasimError> {
        let find = |name: &str| -> Result<usize, DcasimError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DcasimError::MissingColumn {
                    column: name.to_string(),
                })
        };

        let return_pct = RETURN_HEADERS
            .iter()
            .find_map(|name| headers.iter().position(|h| h.trim() == *name))
            .ok_or_else(|| DcasimError::MissingColumn {
                column: RETURN_HEADERS[0].to_string(),
            })?;

        Ok(Columns {
            date: find("date")?,
            open: find("open")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
            volume: find("volume")?,
            return_pct,
        })
    }

    fn parse_bar(&self, record: &StringRecord, row: usize) -> Result<DailyBar, DcasimError> {
        let field = |idx: usize, name: &str| -> Result<&str, DcasimError> {
            record.get(idx).ok_or_else(|| DcasimError::InvalidField {
                row,
                field: name.to_string(),
                reason: "column missing from record".to_string(),
            })
        };

        let date_str = field(self.date, "date")?;
        let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
            DcasimError::InvalidField {
                row,
                field: "date".to_string(),
                reason: e.to_string(),
            }
        })?;

        let parse_f64 = |idx: usize, name: &str| -> Result<f64, DcasimError> {
            field(idx, name)?
                .trim()
                .parse()
                .map_err(|e: std::num::ParseFloatError| DcasimError::InvalidField {
                    row,
                    field: name.to_string(),
                    reason: e.to_string(),
                })
        };

        let volume: i64 = field(self.volume, "volume")?.trim().parse().map_err(
            |e: std::num::ParseIntError| DcasimError::InvalidField {
                row,
                field: "volume".to_string(),
                reason: e.to_string(),
            },
        )?;

        let return_str = field(self.return_pct, "return_pct")?.trim();
        let return_pct = if return_str.is_empty() || return_str.eq_ignore_ascii_case("nan") {
            None
        } else {
            Some(return_str.parse().map_err(|e: std::num::ParseFloatError| {
                DcasimError::InvalidField {
                    row,
                    field: "return_pct".to_string(),
                    reason: e.to_string(),
                }
            })?)
        };

        Ok(DailyBar {
            date,
            open: parse_f64(self.open, "open")?,
            high: parse_f64(self.high, "high")?,
            low: parse_f64(self.low, "low")?,
            close: parse_f64(self.close, "close")?,
            volume,
            return_pct,
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyBar>, DcasimError> {
        let mut bars = Self::read_file(&self.csv_path(symbol))?;

        bars.retain(|b| {
            start_date.is_none_or(|start| b.date >= start)
                && end_date.is_none_or(|end| b.date <= end)
        });
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcasimError> {
        let bars = Self::read_file(&self.csv_path(symbol))?;
        let min = bars.iter().map(|b| b.date).min();
        let max = bars.iter().map(|b| b.date).max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((min, max, bars.len()))),
            _ => Ok(None),
        }
    }
}
