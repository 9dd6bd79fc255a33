//! Relative Strength Index (RSI) with Wilder smoothing.
//!
//! Column: `rsi_{window}`.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! Seed: simple average of the first `window` gains/losses (the first
//! close-to-close changes, which live at rows 1..=window), so the first
//! defined value lands at row `window`. After the seed the averages
//! follow Wilder's recurrence `avg = (prev * (window-1) + x) / window`
//! — an exponential smoothing, deliberately NOT a rolling mean.
//!
//! Ratio policy: avg_loss == 0 with gains present saturates to 100;
//! both averages zero (flat market) is undefined, not 50.

use super::Stage;
use crate::series::Series;

#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    name: String,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "RSI window must be >= 1");
        Self {
            window,
            name: format!("rsi_{window}"),
        }
    }
}

/// One step of Wilder's smoothing state, folded over the gain/loss pairs
/// past the seed. Kept as a standalone struct so the recurrence is
/// testable without a full series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WilderState {
    pub avg_gain: f64,
    pub avg_loss: f64,
}

impl WilderState {
    pub fn step(self, gain: f64, loss: f64, window: usize) -> Self {
        let w = window as f64;
        Self {
            avg_gain: (self.avg_gain * (w - 1.0) + gain) / w,
            avg_loss: (self.avg_loss * (w - 1.0) + loss) / w,
        }
    }

    /// RSI value for this state, applying the ratio policy.
    pub fn rsi(self) -> f64 {
        if self.avg_loss == 0.0 && self.avg_gain == 0.0 {
            f64::NAN // flat market: no information
        } else if self.avg_loss == 0.0 {
            100.0 // saturate instead of dividing by zero
        } else {
            100.0 - 100.0 / (1.0 + self.avg_gain / self.avg_loss)
        }
    }
}

impl Stage for Rsi {
    fn column(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let closes: Vec<f64> = series.closes().collect();
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.window + 1 {
            return result;
        }

        // Close-to-close changes; change[0] has no predecessor.
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change.is_nan() {
                continue;
            }
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        // Seed: simple average over the first `window` changes.
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for i in 1..=self.window {
            if gains[i].is_nan() {
                return result; // NaN in the seed window taints everything
            }
            avg_gain += gains[i];
            avg_loss += losses[i];
        }
        let mut state = WilderState {
            avg_gain: avg_gain / self.window as f64,
            avg_loss: avg_loss / self.window as f64,
        };
        result[self.window] = state.rsi();

        // Wilder recurrence past the seed, strictly in index order.
        for i in (self.window + 1)..n {
            if gains[i].is_nan() {
                // A tainted change invalidates every later smoothed value.
                return result;
            }
            state = state.step(gains[i], losses[i], self.window);
            result[i] = state.rsi();
        }

        result
    }
}
