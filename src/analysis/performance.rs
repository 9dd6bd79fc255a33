//! Summary risk/return statistics over a log-return window.
//!
//! Both statistics drop undefined (NaN) entries first, then work on the
//! surviving samples:
//! - annualized return: `(Π(1+r))^(252/n) - 1`
//! - raw Sharpe ratio: annualized return / (std(r, ddof=1) * sqrt(252))
//!
//! An empty window and zero/undefined volatility are distinct typed
//! errors — a caller must never mistake "no data" for a genuine zero
//! return, or receive a raw ±∞/NaN ratio.

use crate::TRADING_DAYS_PER_YEAR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PerformanceError {
    #[error("no log returns in the requested window")]
    EmptyWindow,

    #[error("volatility over the requested window is zero or undefined")]
    ZeroVolatility,
}

fn defined(returns: &[f64]) -> Vec<f64> {
    returns.iter().copied().filter(|r| !r.is_nan()).collect()
}

/// Annualized compounded return. `returns` may contain NaN warmup
/// entries; they are dropped before compounding.
pub fn annualized_return(returns: &[f64]) -> Result<f64, PerformanceError> {
    let r = defined(returns);
    if r.is_empty() {
        return Err(PerformanceError::EmptyWindow);
    }
    let compounded_growth: f64 = r.iter().map(|v| 1.0 + v).product();
    let n = r.len() as f64;
    Ok(compounded_growth.powf(TRADING_DAYS_PER_YEAR / n) - 1.0)
}

/// Raw Sharpe ratio (no risk-free rate) over the same window.
///
/// Needs at least two samples for a sample standard deviation; a single
/// return — like an exactly-constant return series — has no measurable
/// volatility and is reported as `ZeroVolatility`.
pub fn sharpe_ratio(returns: &[f64]) -> Result<f64, PerformanceError> {
    let r = defined(returns);
    if r.is_empty() {
        return Err(PerformanceError::EmptyWindow);
    }
    let annual_return = annualized_return(&r)?;

    if r.len() < 2 {
        return Err(PerformanceError::ZeroVolatility);
    }
    let n = r.len() as f64;
    let mean = r.iter().sum::<f64>() / n;
    let var = r.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let annual_vol = var.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();

    if annual_vol == 0.0 || !annual_vol.is_finite() {
        return Err(PerformanceError::ZeroVolatility);
    }
    Ok(annual_return / annual_vol)
}
