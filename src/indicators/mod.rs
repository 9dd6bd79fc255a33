//! Indicator stages and the `Stage` trait they share with signal stages.
//!
//! Stages are pure functions: series in, numeric column out. Each stage
//! declares the column it produces, its warmup lookback, and the stages
//! it depends on; the `analysis` orchestrator resolves dependencies and
//! writes the output column back into the series.
//!
//! Warmup contract: the first `lookback()` positions of every output are
//! `f64::NAN`. No value at row t may depend on data from row t+1 or later.

pub mod atr;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use atr::{true_range, Atr};
pub use rsi::Rsi;
pub use sma::MovingAverage;
pub use volatility::{AnnualizedVolatility, LogReturn, RollingVolatility};

use crate::series::Series;

/// Trait for indicator and signal stages.
///
/// A stage computes one named column over the whole series, same length
/// as the date index. Dependencies are declared explicitly so the
/// orchestrator can resolve them — stages never probe the series for
/// missing columns themselves.
pub trait Stage: Send + Sync {
    /// Output column name (e.g., "movingAverage_20", "atr_14").
    fn column(&self) -> &str;

    /// Number of rows needed before the stage produces defined output.
    fn lookback(&self) -> usize;

    /// Stages whose output columns must exist before `compute` runs.
    fn dependencies(&self) -> Vec<Box<dyn Stage>> {
        Vec::new()
    }

    /// Compute the output column for the entire series.
    ///
    /// Returns a `Vec<f64>` of length `series.len()`. The first
    /// `lookback()` values should be `f64::NAN`.
    fn compute(&self, series: &Series) -> Vec<f64>;
}

/// Rolling mean over `window` values. Output[i] is defined once the
/// window `[i-window+1 ..= i]` is full and NaN-free; otherwise NaN.
///
/// Maintains a running sum plus a NaN count so a contaminated window
/// never poisons the sum, and the whole pass stays O(n).
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_count = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }
        if i >= window {
            let leaving = values[i - window];
            if leaving.is_nan() {
                nan_count -= 1;
            } else {
                sum -= leaving;
            }
        }
        if i >= window - 1 && nan_count == 0 {
            result[i] = sum / window as f64;
        }
    }
    result
}

/// Rolling sample standard deviation (degrees of freedom = window - 1).
/// Same window and NaN policy as `rolling_mean`. A window of 1 has no
/// sample variance and stays NaN.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window < 2 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window as f64 - 1.0);
        result[i] = var.sqrt();
    }
    result
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Build a loaded series directly from close prices for testing.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> Series {
    Series::load(make_bars(closes)).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
