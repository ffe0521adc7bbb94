//! Synthetic leveraged price projection.
//!
//! Derives the daily close series of a fixed-multiple leveraged instrument
//! from the base series' percent daily returns. Each value depends on the
//! previous computed value, so this is a single sequential pass.

use crate::domain::bar::DailyBar;

/// The derived leveraged series, index-aligned with the base bars.
#[derive(Debug, Clone, PartialEq)]
pub struct LeveragedSeries {
    /// Base return × multiplier; `None` where the base return is undefined.
    pub returns_pct: Vec<Option<f64>>,
    pub closes: Vec<f64>,
}

/// Project leveraged closes from the base series.
///
/// The day-0 close anchors at the base close (leverage has no effect before a
/// return is observed). For later days with an undefined return the previous
/// close carries forward flat. Multiplier sign is unconstrained; a negative
/// multiplier models an inverse product.
pub fn project(bars: &[DailyBar], multiplier: f64) -> LeveragedSeries {
    let returns_pct: Vec<Option<f64>> = bars
        .iter()
        .map(|bar| bar.return_pct.map(|r| r * multiplier))
        .collect();

    let mut closes = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let close = if i == 0 {
            bar.close
        } else {
            let prev = closes[i - 1];
            match returns_pct[i] {
                Some(r) => prev * (1.0 + r / 100.0),
                None => prev,
            }
        };
        closes.push(close);
    }

    LeveragedSeries { returns_pct, closes }
}
