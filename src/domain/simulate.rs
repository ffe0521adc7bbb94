//! DCA simulation engine.
//!
//! Applies a fixed-amount monthly investment policy to a daily price series
//! and computes per-day cumulative invested capital, cumulative shares held,
//! and portfolio value. The price series is a parameter so one engine serves
//! both the base closes and the projected leveraged closes.

use crate::domain::bar::DailyBar;
use crate::domain::error::DcasimError;
use crate::domain::month::{bucket_by_month, investment_index};

/// Fixed-amount periodic investment policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcaPolicy {
    /// Amount invested once per calendar month.
    pub contribution: f64,
    /// Day-of-month threshold: invest on the first trading day whose
    /// day-of-month is at or past this, or the month's last trading day.
    pub target_day: u32,
}

impl Default for DcaPolicy {
    fn default() -> Self {
        DcaPolicy {
            contribution: 1000.0,
            target_day: 26,
        }
    }
}

/// Per-day simulation output, index-aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLedger {
    /// This month's contribution on the investment day, zero elsewhere.
    pub contribution: f64,
    /// Shares purchased on the investment day, zero elsewhere.
    pub shares_bought: f64,
    pub cumulative_invested: f64,
    pub cumulative_shares: f64,
    /// Cumulative shares valued at this day's own price.
    pub portfolio_value: f64,
}

/// Run the DCA simulation over `bars` priced by `closes`.
///
/// Months are processed as a fold in chronological order, threading the
/// `(cumulative_invested, cumulative_shares)` pair forward: days strictly
/// before a month's investment day carry the totals as they stood at the end
/// of the previous month, days at or after it carry the post-investment
/// totals. Portfolio value always uses the day's own price, so pre-investment
/// days reprice shares bought in earlier months.
///
/// Fails on a non-positive price at an investment day (the division point),
/// naming the offending date.
pub fn simulate(
    bars: &[DailyBar],
    closes: &[f64],
    policy: &DcaPolicy,
) -> Result<Vec<DayLedger>, DcasimError> {
    if bars.len() != closes.len() {
        return Err(DcasimError::Data {
            reason: format!(
                "price series length {} does not match {} bars",
                closes.len(),
                bars.len()
            ),
        });
    }

    let mut entries: Vec<(usize, DayLedger)> = Vec::with_capacity(bars.len());
    let mut invested = 0.0_f64;
    let mut shares = 0.0_f64;

    for bucket in bucket_by_month(bars) {
        let inv_idx = investment_index(&bucket, bars, policy.target_day);
        let price = closes[inv_idx];
        // Negated comparison also rejects NaN prices.
        if !(price > 0.0) {
            return Err(DcasimError::DegeneratePrice {
                date: bars[inv_idx].date,
                field: "close".into(),
                value: price,
            });
        }

        // Snapshot before applying the contribution: recomputing the prior
        // totals as `(running + x) - x` doesn't round-trip in f64 and can
        // dip below last month's totals by a ulp.
        let (prev_invested, prev_shares) = (invested, shares);
        let bought = policy.contribution / price;
        invested += policy.contribution;
        shares += bought;

        let inv_pos = bucket
            .indices
            .iter()
            .position(|&i| i == inv_idx)
            .expect("investment day is a member of its bucket");

        for (pos, &i) in bucket.indices.iter().enumerate() {
            let (cum_invested, cum_shares) = if pos < inv_pos {
                // Pre-investment days carry last month's totals.
                (prev_invested, prev_shares)
            } else {
                (invested, shares)
            };
            let is_investment_day = i == inv_idx;
            entries.push((
                i,
                DayLedger {
                    contribution: if is_investment_day { policy.contribution } else { 0.0 },
                    shares_bought: if is_investment_day { bought } else { 0.0 },
                    cumulative_invested: cum_invested,
                    cumulative_shares: cum_shares,
                    portfolio_value: cum_shares * closes[i],
                },
            ));
        }
    }

    // Buckets partition the input, so this is a permutation of 0..bars.len();
    // sorting restores input-index alignment for unsorted input.
    entries.sort_by_key(|(i, _)| *i);
    Ok(entries.into_iter().map(|(_, day)| day).collect())
}
