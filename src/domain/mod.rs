//! Domain types for PatternLab

pub mod bar;

pub use bar::PriceBar;
