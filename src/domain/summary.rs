//! Summary statistics for a completed simulation run.

use crate::domain::run::SimulationRun;
use crate::domain::simulate::DayLedger;
use chrono::NaiveDate;

const DAYS_PER_YEAR: f64 = 365.25;

/// Per-series (base or leveraged) performance summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub total_invested: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
}

/// Whole-run summary: both series plus comparison figures.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub calendar_days: i64,
    pub bar_count: usize,
    pub investment_months: usize,
    pub multiplier: f64,
    pub base: SeriesSummary,
    pub leveraged: SeriesSummary,
    /// Leveraged absolute return over base absolute return.
    pub return_multiple: f64,
    /// Leveraged final value over base final value.
    pub final_value_ratio: f64,
}

impl RunSummary {
    /// Compute over a non-empty run.
    pub fn compute(run: &SimulationRun) -> Self {
        let start_date = run.bars.first().map(|b| b.date).unwrap_or_default();
        let end_date = run.bars.last().map(|b| b.date).unwrap_or_default();
        let calendar_days = (end_date - start_date).num_days();

        let investment_months = run.base.iter().filter(|d| d.contribution > 0.0).count();

        let base = summarize_series(&run.base, calendar_days);
        let leveraged = summarize_series(&run.leveraged, calendar_days);

        let return_multiple = ratio(leveraged.total_return, base.total_return);
        let final_value_ratio = ratio(leveraged.final_value, base.final_value);

        RunSummary {
            start_date,
            end_date,
            calendar_days,
            bar_count: run.bars.len(),
            investment_months,
            multiplier: run.multiplier,
            base,
            leveraged,
            return_multiple,
            final_value_ratio,
        }
    }
}

fn summarize_series(ledger: &[DayLedger], calendar_days: i64) -> SeriesSummary {
    let total_invested = ledger
        .last()
        .map(|d| d.cumulative_invested)
        .unwrap_or_default();
    let final_value = ledger.last().map(|d| d.portfolio_value).unwrap_or_default();
    let total_return = final_value - total_invested;

    let return_pct = if total_invested > 0.0 {
        total_return / total_invested * 100.0
    } else {
        0.0
    };

    let annualized_return_pct = if total_invested > 0.0 && calendar_days > 0 {
        ((final_value / total_invested).powf(DAYS_PER_YEAR / calendar_days as f64) - 1.0) * 100.0
    } else {
        0.0
    };

    SeriesSummary {
        total_invested,
        final_value,
        total_return,
        return_pct,
        annualized_return_pct,
        max_drawdown_pct: max_drawdown_pct(ledger),
    }
}

/// Largest peak-to-trough decline of the portfolio-value curve, as a
/// positive percentage. Days before the first investment carry a zero value
/// and are skipped.
fn max_drawdown_pct(ledger: &[DayLedger]) -> f64 {
    let mut peak = 0.0_f64;
    let mut worst = 0.0_f64;

    for day in ledger {
        if day.portfolio_value > peak {
            peak = day.portfolio_value;
        }
        if peak > 0.0 {
            let drawdown = (peak - day.portfolio_value) / peak;
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }

    worst * 100.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
