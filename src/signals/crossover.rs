//! Moving average crossover — golden cross and death cross detection.
//!
//! Columns:
//! - `crossover_state`: 1.0 when the fast MA is above the slow MA, 0.0
//!   otherwise; NaN while either MA is still warming up.
//! - `signal`: first difference of `crossover_state`. +1 marks a bullish
//!   cross (golden cross), -1 a bearish cross (death cross), 0 no change;
//!   NaN where the current or previous state is undefined.
//!
//! The window pair is an explicit parameter; (20, 50) is the
//! conventional default pair.

use crate::indicators::{MovingAverage, Stage};
use crate::series::Series;

/// Fast/slow moving-average window pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaPair {
    pub fast: usize,
    pub slow: usize,
}

impl MaPair {
    pub fn new(fast: usize, slow: usize) -> Self {
        assert!(fast >= 1, "fast window must be >= 1");
        assert!(slow > fast, "slow window must be > fast window");
        Self { fast, slow }
    }

    pub fn fast_column(&self) -> String {
        format!("movingAverage_{}", self.fast)
    }

    pub fn slow_column(&self) -> String {
        format!("movingAverage_{}", self.slow)
    }
}

impl Default for MaPair {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

/// Crossover state: is the fast MA above the slow MA?
#[derive(Debug, Clone)]
pub struct CrossoverState {
    pair: MaPair,
}

pub const CROSSOVER_STATE_COLUMN: &str = "crossover_state";
pub const SIGNAL_COLUMN: &str = "signal";

impl CrossoverState {
    pub fn new(pair: MaPair) -> Self {
        Self { pair }
    }
}

impl Stage for CrossoverState {
    fn column(&self) -> &str {
        CROSSOVER_STATE_COLUMN
    }

    fn lookback(&self) -> usize {
        self.pair.slow.saturating_sub(1)
    }

    fn dependencies(&self) -> Vec<Box<dyn Stage>> {
        vec![
            Box::new(MovingAverage::new(self.pair.fast)),
            Box::new(MovingAverage::new(self.pair.slow)),
        ]
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let fast = series
            .column(&self.pair.fast_column())
            .expect("fast MA column resolved by the orchestrator");
        let slow = series
            .column(&self.pair.slow_column())
            .expect("slow MA column resolved by the orchestrator");

        fast.iter()
            .zip(slow)
            .map(|(f, s)| {
                if f.is_nan() || s.is_nan() {
                    f64::NAN
                } else if f > s {
                    1.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

/// Crossover event signal: first difference of the crossover state.
#[derive(Debug, Clone)]
pub struct CrossoverSignal {
    pair: MaPair,
}

impl CrossoverSignal {
    pub fn new(pair: MaPair) -> Self {
        Self { pair }
    }
}

impl Stage for CrossoverSignal {
    fn column(&self) -> &str {
        SIGNAL_COLUMN
    }

    fn lookback(&self) -> usize {
        self.pair.slow
    }

    fn dependencies(&self) -> Vec<Box<dyn Stage>> {
        vec![Box::new(CrossoverState::new(self.pair))]
    }

    fn compute(&self, series: &Series) -> Vec<f64> {
        let state = series
            .column(CROSSOVER_STATE_COLUMN)
            .expect("crossover_state column resolved by the orchestrator");

        let n = state.len();
        let mut result = vec![f64::NAN; n];
        for i in 1..n {
            result[i] = state[i] - state[i - 1]; // NaN-in, NaN-out
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::indicators::make_bars;

    /// Closes engineered so MA(2) crosses above MA(3) exactly once:
    /// a falling run, then a sustained rally.
    fn single_cross_closes() -> Vec<f64> {
        vec![110.0, 108.0, 106.0, 104.0, 102.0, 106.0, 112.0, 118.0, 124.0, 130.0]
    }

    #[test]
    fn state_is_one_when_fast_above_slow() {
        let mut analysis = Analysis::load(make_bars(&single_cross_closes())).unwrap();
        analysis.crossover_signal(2, 3);
        let series = analysis.series();
        let state = series.column(CROSSOVER_STATE_COLUMN).unwrap();
        let fast = series.column("movingAverage_2").unwrap();
        let slow = series.column("movingAverage_3").unwrap();

        for i in 0..state.len() {
            if fast[i].is_nan() || slow[i].is_nan() {
                assert!(state[i].is_nan());
            } else {
                let expected = if fast[i] > slow[i] { 1.0 } else { 0.0 };
                assert_eq!(state[i], expected, "row {i}");
            }
        }
    }

    #[test]
    fn single_golden_cross_yields_exactly_one_plus_one() {
        let mut analysis = Analysis::load(make_bars(&single_cross_closes())).unwrap();
        analysis.crossover_signal(2, 3);
        let signal = analysis.series().column(SIGNAL_COLUMN).unwrap();

        let plus: Vec<usize> = (0..signal.len()).filter(|&i| signal[i] == 1.0).collect();
        let minus: Vec<usize> = (0..signal.len()).filter(|&i| signal[i] == -1.0).collect();
        assert_eq!(plus.len(), 1, "expected exactly one bullish cross");
        assert!(
            minus.iter().all(|&i| i > plus[0]),
            "no bearish cross before the bullish one"
        );
    }

    #[test]
    fn signal_undefined_without_prior_state() {
        let mut analysis = Analysis::load(make_bars(&single_cross_closes())).unwrap();
        analysis.crossover_signal(2, 3);
        let series = analysis.series();
        let state = series.column(CROSSOVER_STATE_COLUMN).unwrap();
        let signal = series.column(SIGNAL_COLUMN).unwrap();

        assert!(signal[0].is_nan());
        // First row with a defined state still has an undefined diff.
        let first_defined = (0..state.len()).find(|&i| !state[i].is_nan()).unwrap();
        assert!(signal[first_defined].is_nan());
    }

    #[test]
    fn default_pair_is_20_50() {
        let pair = MaPair::default();
        assert_eq!(pair.fast_column(), "movingAverage_20");
        assert_eq!(pair.slow_column(), "movingAverage_50");
    }

    #[test]
    #[should_panic(expected = "slow window must be > fast window")]
    fn rejects_inverted_pair() {
        MaPair::new(50, 20);
    }

    #[test]
    fn declares_ma_dependencies() {
        let deps = CrossoverState::new(MaPair::default()).dependencies();
        let cols: Vec<_> = deps.iter().map(|d| d.column().to_string()).collect();
        assert_eq!(cols, vec!["movingAverage_20", "movingAverage_50"]);

        let deps = CrossoverSignal::new(MaPair::default()).dependencies();
        assert_eq!(deps[0].column(), CROSSOVER_STATE_COLUMN);
    }
}
