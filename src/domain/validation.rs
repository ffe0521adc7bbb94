//! Ingestion-time series validation.
//!
//! The simulation core carries cumulative state forward, so corrupt input
//! would propagate silently as wrong totals. Shape is therefore checked once
//! here, failing fast with a diagnostic naming the offending date and field.

use crate::domain::bar::DailyBar;
use crate::domain::error::DcasimError;

/// Validate a raw series and return it sorted by date.
///
/// Rejects: an empty series, duplicate dates, non-positive prices, and
/// negative volume. Calendar gaps (holidays, missing source days) are
/// tolerated; see [`crate::domain::integrity`] for gap reporting.
pub fn validate_series(
    mut bars: Vec<DailyBar>,
    symbol: &str,
) -> Result<Vec<DailyBar>, DcasimError> {
    if bars.is_empty() {
        return Err(DcasimError::EmptySeries {
            symbol: symbol.to_string(),
        });
    }

    bars.sort_by_key(|b| b.date);

    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(DcasimError::DuplicateDate { date: pair[0].date });
        }
    }

    for bar in &bars {
        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !(value > 0.0) {
                return Err(DcasimError::DegeneratePrice {
                    date: bar.date,
                    field: field.into(),
                    value,
                });
            }
        }
        if bar.volume < 0 {
            return Err(DcasimError::InvalidBar {
                date: bar.date,
                field: "volume".into(),
                reason: format!("negative volume {}", bar.volume),
            });
        }
    }

    Ok(bars)
}
