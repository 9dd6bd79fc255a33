//! Analysis session — stage orchestration over one price series.
//!
//! An `Analysis` owns the `Series` for one symbol/run and runs stages
//! against it. Dependencies are declared by each stage and resolved here,
//! depth-first, computing each missing column at most once; the requested
//! stage itself always recomputes, deterministically overwriting its
//! column. No hidden incremental state survives between calls.

pub mod performance;

pub use performance::PerformanceError;

use chrono::NaiveDate;

use crate::domain::PriceBar;
use crate::indicators::{
    AnnualizedVolatility, Atr, LogReturn, MovingAverage, RollingVolatility, Rsi, Stage,
};
use crate::series::{Series, SeriesError};
use crate::signals::{AtrRegime, CrossoverSignal, MaPair};

/// Errors from reading analysis results.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("column '{0}' has not been computed")]
    MissingColumn(String),
}

/// One analysis run: the series plus the orchestrator that grows it.
#[derive(Debug, Clone)]
pub struct Analysis {
    series: Series,
}

impl Analysis {
    /// Start a run from raw fetched rows. Sorts and validates the index.
    pub fn load(rows: Vec<PriceBar>) -> Result<Self, SeriesError> {
        Ok(Self {
            series: Series::load(rows)?,
        })
    }

    pub fn from_series(series: Series) -> Self {
        Self { series }
    }

    /// The series with every column computed so far — the full output
    /// handed to the display collaborator.
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn into_series(self) -> Series {
        self.series
    }

    /// A computed column, as an error rather than an Option for callers
    /// that consider its absence a contract violation.
    pub fn require_column(&self, name: &str) -> Result<&[f64], AnalysisError> {
        self.series
            .column(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Run a stage: resolve its declared dependencies (computing each
    /// missing column once), then compute and overwrite its own column.
    pub fn run(&mut self, stage: &dyn Stage) -> &[f64] {
        for dep in stage.dependencies() {
            self.ensure(dep.as_ref());
        }
        self.insert(stage);
        self.series
            .column(stage.column())
            .expect("column inserted above")
    }

    /// Compute a stage's column only if absent (idempotent dependency
    /// resolution), recursing into its own dependencies first.
    fn ensure(&mut self, stage: &dyn Stage) {
        if self.series.has_column(stage.column()) {
            return;
        }
        for dep in stage.dependencies() {
            self.ensure(dep.as_ref());
        }
        self.insert(stage);
    }

    fn insert(&mut self, stage: &dyn Stage) {
        let values = stage.compute(&self.series);
        debug_assert_eq!(
            values.len(),
            self.series.len(),
            "stage '{}' produced {} values for {} rows",
            stage.column(),
            values.len(),
            self.series.len()
        );
        self.series.insert_column(stage.column().to_string(), values);
    }

    // ── Indicator pipeline ───────────────────────────────────────────

    /// `movingAverage_{window}`.
    pub fn moving_average(&mut self, window: usize) -> &[f64] {
        self.run(&MovingAverage::new(window))
    }

    /// `rsi_{window}` (Wilder smoothing).
    pub fn rsi(&mut self, window: usize) -> &[f64] {
        self.run(&Rsi::new(window))
    }

    /// `log_return`.
    pub fn log_return(&mut self) -> &[f64] {
        self.run(&LogReturn::new())
    }

    /// `volatility_{window}` plus `annualized_vol_{window}` in one call,
    /// the way the original analysis flow produced them. Returns the raw
    /// (unannualized) column.
    pub fn rolling_volatility(&mut self, window: usize) -> &[f64] {
        self.run(&AnnualizedVolatility::new(window));
        self.run(&RollingVolatility::new(window))
    }

    /// `atr_{period}`.
    pub fn average_true_range(&mut self, period: usize) -> &[f64] {
        self.run(&Atr::new(period))
    }

    // ── Signal generation ────────────────────────────────────────────

    /// `crossover_state` and `signal` for an explicit fast/slow MA pair.
    /// Returns the `signal` column.
    pub fn crossover_signal(&mut self, fast: usize, slow: usize) -> &[f64] {
        self.run(&CrossoverSignal::new(MaPair::new(fast, slow)))
    }

    /// `atr_let_run` with the given regime parameters (MA pair 20/50).
    pub fn atr_regime_signal(
        &mut self,
        atr_period: usize,
        regime_window: usize,
        calm_threshold: f64,
    ) -> &[f64] {
        self.run(&AtrRegime::new(atr_period, regime_window, calm_threshold))
    }

    /// `atr_let_run` with full control over the stage parameters.
    pub fn atr_regime(&mut self, stage: AtrRegime) -> &[f64] {
        self.run(&stage)
    }

    // ── Performance evaluation ───────────────────────────────────────

    /// Log returns from `start_date` (or the whole series), NaN entries
    /// still in place; the performance functions drop them.
    fn returns_window(&mut self, start_date: Option<NaiveDate>) -> Vec<f64> {
        self.ensure(&LogReturn::new());
        let returns = self
            .series
            .column(crate::indicators::volatility::LOG_RETURN_COLUMN)
            .expect("log_return ensured above");
        let from = match start_date {
            Some(date) => self.series.position_from(date),
            None => 0,
        };
        returns[from.min(returns.len())..].to_vec()
    }

    /// Annualized compounded return over the (optionally date-filtered)
    /// log-return window.
    pub fn annualized_return(
        &mut self,
        start_date: Option<NaiveDate>,
    ) -> Result<f64, PerformanceError> {
        performance::annualized_return(&self.returns_window(start_date))
    }

    /// Raw Sharpe ratio (no risk-free rate) over the same window.
    pub fn sharpe_ratio(
        &mut self,
        start_date: Option<NaiveDate>,
    ) -> Result<f64, PerformanceError> {
        performance::sharpe_ratio(&self.returns_window(start_date))
    }
}
