//! Price-source port trait.
//!
//! Contract for the external price source: an ordered daily OHLCV series for
//! a symbol and date range. The series may have gaps (holidays, missing
//! source days); the simulation core tolerates them.

use crate::domain::bar::DailyBar;
use crate::domain::error::DcasimError;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyBar>, DcasimError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DcasimError>;
}
