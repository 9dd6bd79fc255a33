//! Series store — the canonical date-indexed price series plus derived columns.
//!
//! One `Series` per analysis run, built once from raw `PriceBar` rows and
//! then grown append-only by indicator and signal stages. Rows are sorted
//! by date on load; duplicate dates are rejected (one symbol, one bar per
//! trading day — ambiguous input is an upstream contract violation, not
//! something to paper over).
//!
//! Derived columns are plain `Vec<f64>` aligned 1:1 with the date index.
//! Undefined positions (insufficient history, undefined ratios) hold
//! `f64::NAN` — never 0, which would be indistinguishable from a real value.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::PriceBar;

/// Errors raised while building a series from raw rows.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("duplicate date in price history: {0}")]
    DuplicateDate(NaiveDate),
}

/// Ordered mapping from trading date to a growing set of named columns,
/// seeded with the five OHLCV fields.
#[derive(Debug, Clone, Default)]
pub struct Series {
    bars: Vec<PriceBar>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl Series {
    /// Build a series from raw rows: sort ascending by date, reject
    /// duplicates. An empty input yields an empty series (every derived
    /// column will be empty too — not an error).
    pub fn load(mut rows: Vec<PriceBar>) -> Result<Self, SeriesError> {
        rows.sort_by_key(|b| b.date);
        for pair in rows.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(SeriesError::DuplicateDate(pair[0].date));
            }
        }
        Ok(Self {
            bars: rows,
            columns: BTreeMap::new(),
        })
    }

    /// Number of rows (trading days).
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The sorted raw bars.
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// The date index, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    /// First positional index with date >= `date`, or `len()` if every
    /// row is earlier. Used for start-date sub-window filtering.
    pub fn position_from(&self, date: NaiveDate) -> usize {
        self.bars.partition_point(|b| b.date < date)
    }

    /// Insert (or deterministically overwrite) a derived column.
    ///
    /// A length mismatch is a programming error in the stage that
    /// produced the values, not a recoverable condition.
    pub fn insert_column(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        assert_eq!(
            values.len(),
            self.bars.len(),
            "column '{name}' has {} values for {} rows",
            values.len(),
            self.bars.len()
        );
        self.columns.insert(name, values);
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Full derived column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// Single value of a derived column. `None` means the column or index
    /// does not exist; a present-but-undefined position is `Some(NAN)`.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name).and_then(|v| v.get(index).copied())
    }

    /// Names of all derived columns, in deterministic (sorted) order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }
}
