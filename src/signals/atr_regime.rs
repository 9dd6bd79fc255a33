//! ATR "calm uptrend" regime — let winners run while volatility is quiet.
//!
//! Column: `atr_let_run` ∈ {0, 1}.
//! 1 exactly when both hold at a row:
//! - calm: ATR below `calm_threshold` × its own rolling mean over
//!   `regime_window`
//! - uptrend: close > fast MA and fast MA > slow MA
//!
//! Undefined inputs (ATR/MA warmup) collapse to 0: the column is a clean
//! 0/1 execution gate, and "not yet knowable" is treated as "not in
//! regime". Callers that need the distinction can inspect the NaN prefix
//! of `atr_{period}` directly.

use crate::indicators::{rolling_mean, Atr, MovingAverage, Stage};
use crate::series::Series;
use crate::signals::MaPair;

#[derive(Debug, Clone)]
pub struct AtrRegime {
    atr_period: usize,
    regime_window: usize,
    calm_threshold: f64,
    pair: MaPair,
}

pub const ATR_LET_RUN_COLUMN: &str = "atr_let_run";

impl AtrRegime {
    pub fn new(atr_period: usize, regime_window: usize, calm_threshold: f64) -> Self {
        Self::with_ma_pair(atr_period, regime_window, calm_threshold, MaPair::default())
    }

    pub fn with_ma_pair(
        atr_period: usize,
        regime_window: usize,
        calm_threshold: f64,
        pair: MaPair,
    ) -> Self {
        assert!(atr_period >= 1, "ATR period must be >= 1");
        assert!(regime_window >= 1, "regime window must be >= 1");
        assert!(
            calm_threshold.is_finite() && calm_threshold > 0.0,
            "calm threshold must be positive and finite"
        );
        Self {
            atr_period,
            regime_window,
            calm_threshold,
            pair,
        }
    }

    /// The conventional defaults: ATR(14), 50-day regime window, 0.8 threshold.
    pub fn default_params() -> Self {
        Self::new(14, 50, 0.8)
    }
}

impl Stage for AtrRegime {
    fn column(&self) -> &str {
        ATR_LET_RUN_COLUMN
    }

    fn lookback(&self) -> usize {
        // First row that can possibly be 1: the ATR rolling mean needs
        // `regime_window` defined ATRs, the slow MA needs its own warmup.
        let atr_mean_ready = self.atr_period + self.regime_window - 1;
        atr_mean_ready.max(self.pair.slow.saturating_sub(1))
    }

    fn dependencies(&self) -> Vec<Box<dyn Stage>> {
        vec![
            Box::new(Atr::new(self.atr_period)),
            Box::new(MovingAverage::new(self.pair.fast)),
            Box::new(MovingAverage::new(self.pair.slow)),
        ]
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let atr = series
            .column(&format!("atr_{}", self.atr_period))
            .expect("ATR column resolved by the orchestrator");
        let ma_fast = series
            .column(&self.pair.fast_column())
            .expect("fast MA column resolved by the orchestrator");
        let ma_slow = series
            .column(&self.pair.slow_column())
            .expect("slow MA column resolved by the orchestrator");

        let atr_mean = rolling_mean(atr, self.regime_window);

        series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                // NaN comparisons are false, so undefined rows fall out as 0.
                let calm = atr[i] < self.calm_threshold * atr_mean[i];
                let uptrend = bar.close > ma_fast[i] && ma_fast[i] > ma_slow[i];
                if calm && uptrend {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}
