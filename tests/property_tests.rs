//! Property tests for indicator invariants.
//!
//! Uses proptest to verify:
//! 1. Moving average definedness — defined iff a full window exists, and
//!    equal to the arithmetic mean of that window
//! 2. RSI bounds and saturation — always within [0, 100], exactly 100 on
//!    monotone rallies past the seed
//! 3. ATR warmup — undefined until a full period of true ranges exists
//! 4. Determinism — re-running any stage reproduces its column exactly
//! 5. Load normalization — shuffled input rows sort to the same series

use chrono::NaiveDate;
use proptest::prelude::*;

use patternlab::analysis::Analysis;
use patternlab::domain::PriceBar;
use patternlab::indicators::{MovingAverage, Rsi, Stage};
use patternlab::series::Series;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_close() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_close(), 2..80)
}

fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

// ── 1. Moving average definedness ────────────────────────────────────

proptest! {
    /// movingAverage(w)[i] is defined iff i >= w-1, and equals the mean
    /// of the trailing w closes.
    #[test]
    fn ma_defined_iff_full_window(closes in arb_closes(), window in 1usize..12) {
        let series = Series::load(make_bars(&closes)).unwrap();
        let out = MovingAverage::new(window).compute(&series);
        prop_assert_eq!(out.len(), closes.len());

        for i in 0..closes.len() {
            if i + 1 >= window {
                let mean: f64 =
                    closes[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                prop_assert!((out[i] - mean).abs() < 1e-9,
                    "row {}: got {}, want {}", i, out[i], mean);
            } else {
                prop_assert!(out[i].is_nan(), "row {} should be warmup NaN", i);
            }
        }
    }
}

// ── 2. RSI bounds and saturation ─────────────────────────────────────

proptest! {
    /// RSI stays inside [0, 100] wherever it is defined.
    #[test]
    fn rsi_within_bounds(closes in arb_closes(), window in 1usize..10) {
        let series = Series::load(make_bars(&closes)).unwrap();
        let out = Rsi::new(window).compute(&series);
        for (i, &v) in out.iter().enumerate() {
            if !v.is_nan() {
                prop_assert!((0.0..=100.0).contains(&v), "row {}: {}", i, v);
            }
        }
    }

    /// A strictly rising close series keeps avg_loss at 0: RSI must be
    /// exactly 100 from the seed onward — the Wilder recurrence must not
    /// decay it, and the zero denominator must not produce NaN.
    #[test]
    fn rsi_saturates_on_monotone_rally(
        start in 50.0..200.0_f64,
        steps in prop::collection::vec(0.5..5.0_f64, 5..40),
        window in 1usize..5,
    ) {
        let mut closes = vec![start];
        for step in &steps {
            closes.push(closes.last().unwrap() + step);
        }
        let series = Series::load(make_bars(&closes)).unwrap();
        let out = Rsi::new(window).compute(&series);
        for (i, &v) in out.iter().enumerate() {
            if i < window {
                prop_assert!(v.is_nan());
            } else {
                prop_assert!((v - 100.0).abs() < 1e-9, "row {}: {}", i, v);
            }
        }
    }
}

// ── 3. ATR warmup ────────────────────────────────────────────────────

proptest! {
    /// ATR is undefined until a full period of true ranges exists (true
    /// range itself starts at row 1), defined everywhere after.
    #[test]
    fn atr_warmup_boundary(closes in arb_closes(), period in 1usize..10) {
        let mut analysis = Analysis::load(make_bars(&closes)).unwrap();
        let out = analysis.average_true_range(period).to_vec();

        for (i, &v) in out.iter().enumerate() {
            if i < period {
                prop_assert!(v.is_nan(), "row {} inside warmup", i);
            } else {
                prop_assert!(!v.is_nan(), "row {} past warmup", i);
            }
        }
    }
}

// ── 4. Determinism ───────────────────────────────────────────────────

proptest! {
    /// Re-running the whole stage set over the same input yields
    /// bit-identical columns: no hidden incremental state.
    #[test]
    fn stages_are_deterministic(closes in arb_closes()) {
        let run = |closes: &[f64]| {
            let mut analysis = Analysis::load(make_bars(closes)).unwrap();
            analysis.moving_average(3);
            analysis.rsi(3);
            analysis.rolling_volatility(3);
            analysis.average_true_range(3);
            analysis.crossover_signal(2, 3);
            analysis.atr_regime_signal(2, 3, 0.8);
            analysis.into_series()
        };
        let first = run(&closes);
        let second = run(&closes);

        for name in first.column_names() {
            let a = first.column(name).unwrap();
            let b = second.column(name).unwrap();
            prop_assert_eq!(a.len(), b.len());
            for i in 0..a.len() {
                prop_assert!(
                    a[i].to_bits() == b[i].to_bits(),
                    "column {} row {}: {} vs {}", name, i, a[i], b[i]
                );
            }
        }
    }

    /// Running a stage twice within one session overwrites with the same
    /// values it produced the first time.
    #[test]
    fn rerun_overwrites_identically(closes in arb_closes(), window in 1usize..8) {
        let mut analysis = Analysis::load(make_bars(&closes)).unwrap();
        let first = analysis.moving_average(window).to_vec();
        let second = analysis.moving_average(window).to_vec();
        for (a, b) in first.iter().zip(&second) {
            prop_assert!(a.to_bits() == b.to_bits());
        }
    }
}

// ── 5. Load normalization ────────────────────────────────────────────

proptest! {
    /// Loading rows in any order produces the same sorted series.
    #[test]
    fn load_order_independent(closes in arb_closes(), seed in 0u64..1000) {
        let bars = make_bars(&closes);

        // Cheap deterministic shuffle.
        let mut shuffled = bars.clone();
        let n = shuffled.len();
        let mut state = seed.wrapping_add(0x9e3779b97f4a7c15);
        for i in (1..n).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let a = Series::load(bars).unwrap();
        let b = Series::load(shuffled).unwrap();
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.bars().iter().zip(b.bars()) {
            prop_assert_eq!(x, y);
        }
    }
}
