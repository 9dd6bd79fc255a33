//! Log returns and realized volatility.
//!
//! Columns:
//! - `log_return`: ln(close[i] / close[i-1]), NaN at row 0. Computed once
//!   and shared by the volatility stages and the performance evaluator.
//! - `volatility_{window}`: rolling sample standard deviation of log
//!   returns (degrees of freedom = window - 1).
//! - `annualized_vol_{window}`: `volatility_{window} * sqrt(252)`.

use super::{rolling_std, Stage};
use crate::series::Series;
use crate::TRADING_DAYS_PER_YEAR;

/// Natural log of consecutive close ratios.
#[derive(Debug, Clone, Default)]
pub struct LogReturn;

pub const LOG_RETURN_COLUMN: &str = "log_return";

impl LogReturn {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for LogReturn {
    fn column(&self) -> &str {
        LOG_RETURN_COLUMN
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let closes: Vec<f64> = series.closes().collect();
        let n = closes.len();
        let mut result = vec![f64::NAN; n];
        for i in 1..n {
            let ratio = closes[i] / closes[i - 1];
            if ratio > 0.0 {
                result[i] = ratio.ln();
            }
        }
        result
    }
}

/// Rolling standard deviation of log returns.
#[derive(Debug, Clone)]
pub struct RollingVolatility {
    window: usize,
    name: String,
}

impl RollingVolatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            name: format!("volatility_{window}"),
        }
    }
}

impl Stage for RollingVolatility {
    fn column(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        // One row for the first log return, window - 1 more to fill it.
        self.window
    }

    fn dependencies(&self) -> Vec<Box<dyn Stage>> {
        vec![Box::new(LogReturn::new())]
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let returns = series
            .column(LOG_RETURN_COLUMN)
            .expect("log_return column resolved by the orchestrator");
        rolling_std(returns, self.window)
    }
}

/// Annualized rolling volatility: `volatility_{window} * sqrt(252)`.
#[derive(Debug, Clone)]
pub struct AnnualizedVolatility {
    window: usize,
    name: String,
}

impl AnnualizedVolatility {
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            name: format!("annualized_vol_{window}"),
        }
    }
}

impl Stage for AnnualizedVolatility {
    fn column(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn dependencies(&self) -> Vec<Box<dyn Stage>> {
        vec![Box::new(RollingVolatility::new(self.window))]
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let vol = series
            .column(&format!("volatility_{}", self.window))
            .expect("volatility column resolved by the orchestrator");
        let factor = TRADING_DAYS_PER_YEAR.sqrt();
        vol.iter().map(|v| v * factor).collect()
    }
}
