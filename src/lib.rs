//! PatternLab Core — technical-analysis engine for daily OHLCV series.
//!
//! This crate contains the analytical heart of the system:
//! - Domain types (price bars)
//! - Date-indexed series store with named derived columns
//! - Indicator stages (moving average, RSI with Wilder smoothing,
//!   log-return volatility, Average True Range)
//! - Composite signal stages (MA crossover, ATR calm-uptrend regime)
//! - Performance evaluation (annualized return, raw Sharpe ratio)
//!
//! Data fetching, chart rendering, and the dashboard are external
//! collaborators: callers feed in `PriceBar` rows and read back the
//! computed `Series` plus the two scalar performance numbers.
//!
//! Undefined values (insufficient history, undefined ratios) are
//! `f64::NAN` inside columns; whole-computation failures are typed
//! `Result` errors. No I/O happens anywhere in this crate.

pub mod analysis;
pub mod domain;
pub mod indicators;
pub mod series;
pub mod signals;

pub use analysis::{Analysis, AnalysisError, PerformanceError};
pub use domain::PriceBar;
pub use series::{Series, SeriesError};

/// Assumed trading days per year, used for annualizing returns and
/// volatility. Fixed by design: the source system hardcodes 252 and the
/// two performance numbers are only comparable across runs if everyone
/// annualizes the same way.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
