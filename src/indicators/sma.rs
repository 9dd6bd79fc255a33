//! Simple moving average of close prices.
//!
//! Column: `movingAverage_{window}`.
//! Value at row i = mean(close[i-window+1 ..= i]) once i >= window-1.
//! Lookback: window - 1.

use super::{rolling_mean, Stage};
use crate::series::Series;

#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    name: String,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "moving average window must be >= 1");
        Self {
            window,
            name: format!("movingAverage_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Stage for MovingAverage {
    fn column(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let closes: Vec<f64> = series.closes().collect();
        rolling_mean(&closes, self.window)
    }
}
