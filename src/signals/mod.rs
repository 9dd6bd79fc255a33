//! Composite signal stages layered on top of indicator columns.
//!
//! Signals are `Stage` implementations like indicators, but they read
//! derived columns rather than raw prices, and declare those columns'
//! stages as dependencies for the orchestrator to resolve.

pub mod atr_regime;
pub mod crossover;

pub use atr_regime::AtrRegime;
pub use crossover::{CrossoverSignal, CrossoverState, MaPair};
