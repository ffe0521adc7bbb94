//! Full simulation pipeline: base DCA, leverage projection, leveraged DCA.

use crate::domain::bar::DailyBar;
use crate::domain::error::DcasimError;
use crate::domain::leverage::{self, LeveragedSeries};
use crate::domain::simulate::{simulate, DayLedger, DcaPolicy};

/// One complete simulation over a validated, date-sorted series. All vectors
/// are index-aligned with `bars`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub bars: Vec<DailyBar>,
    pub policy: DcaPolicy,
    pub multiplier: f64,
    pub base: Vec<DayLedger>,
    pub leveraged_series: LeveragedSeries,
    pub leveraged: Vec<DayLedger>,
}

/// Run the whole pipeline. `bars` must come from
/// [`crate::domain::validation::validate_series`].
pub fn run_simulation(
    bars: Vec<DailyBar>,
    policy: DcaPolicy,
    multiplier: f64,
) -> Result<SimulationRun, DcasimError> {
    let base_closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let base = simulate(&bars, &base_closes, &policy)?;

    let leveraged_series = leverage::project(&bars, multiplier);
    let leveraged = simulate(&bars, &leveraged_series.closes, &policy)?;

    Ok(SimulationRun {
        bars,
        policy,
        multiplier,
        base,
        leveraged_series,
        leveraged,
    })
}
