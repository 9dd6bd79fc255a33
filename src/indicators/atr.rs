//! Average True Range (ATR).
//!
//! Column: `atr_{period}`.
//! True range at row i = max(high-low, |high-prev_close|, |low-prev_close|);
//! undefined at row 0 (no previous close).
//! ATR is a plain rolling mean of true range over `period` — NOT Wilder
//! smoothing. RSI smooths recursively; ATR here deliberately does not.

use super::{rolling_mean, Stage};
use crate::domain::PriceBar;
use crate::series::Series;

/// True Range series. TR[0] is NaN: the gap measures need a prior close.
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Stage for Atr {
    fn column(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        // TR starts at row 1, then a full `period` window.
        self.period
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        rolling_mean(&true_range(series.bars()), self.period)
    }
}
