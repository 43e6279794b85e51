//! End-to-end classification tests through the public API.
//!
//! Tests:
//! 1. Golden scenario: a 20-bar rise/fall/rise series with default params.
//! 2. Degenerate inputs: empty, single point, flat price.
//! 3. Threshold exactness: RSI landing exactly on 30 or 70.
//! 4. Override precedence on computed (not hand-built) indicators.
//! 5. Unordered timestamps are not validated or reordered.
//! 6. MA-confluence BUY/SELL on computed indicators.

use chrono::{NaiveDate, NaiveDateTime};
use momentumlab_core::{
    classify, evaluate, ClassifierMode, IndicatorWindows, PricePoint, Signal, StrategyEngine,
    StrategyParams,
};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn series(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(base_time() + chrono::Duration::minutes(i as i64), close))
        .collect()
}

fn labels(s: &str) -> Vec<Signal> {
    s.split_whitespace()
        .map(|l| match l {
            "B" => Signal::Buy,
            "S" => Signal::Sell,
            "H" => Signal::Hold,
            other => panic!("bad label {other}"),
        })
        .collect()
}

const GOLDEN_CLOSES: [f64; 20] = [
    10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 14.0, 13.0, 12.0, 11.0, 10.0, 9.0, 8.0, 9.0, 10.0, 11.0,
    12.0, 13.0, 14.0, 15.0,
];

// ──────────────────────────────────────────────
// 1. Golden scenario
// ──────────────────────────────────────────────

#[test]
fn golden_rise_fall_rise() {
    let signals = classify(&series(&GOLDEN_CLOSES), &StrategyParams::default()).unwrap();

    // 0: no prior delta, MACD == signal → HOLD
    // 1-7: RSI > 70 overrides the MACD BUY
    // 8-9: MACD still above its signal line after the top
    // 10-16: MACD below signal (13 and 14 also bearish divergence)
    // 17-19: MACD back above signal
    let expected = labels("H S S S S S S S B B S S S S S S S B B B");
    assert_eq!(signals.len(), 20);
    assert_eq!(signals.as_slice(), expected.as_slice());
    assert_eq!(signals.current(), Some(Signal::Buy));
}

#[test]
fn golden_indicator_values() {
    let output = evaluate(&series(&GOLDEN_CLOSES), &StrategyParams::default()).unwrap();
    let rows = output.frame.rows();

    assert_eq!(rows[0].macd, 0.0);
    assert_eq!(rows[0].rsi, None);
    assert_eq!(rows[1].rsi, Some(100.0));

    let close_to = |a: f64, b: f64| (a - b).abs() < 1e-9;
    assert!(close_to(rows[5].macd, 0.878_374_458_438_035_1));
    assert!(close_to(rows[5].macd_signal, 0.358_271_756_375_824_65));
    assert!(close_to(rows[6].rsi.unwrap(), 83.333_333_333_333_33));
    assert!(close_to(rows[12].macd, -0.051_929_000_217_214_14));
    assert!(close_to(rows[13].rsi.unwrap(), 46.153_846_153_846_15));
    assert!(close_to(rows[19].macd, 0.613_193_344_856_025_4));
}

#[test]
fn golden_has_buy_and_sell_after_first_bar() {
    let signals = classify(&series(&GOLDEN_CLOSES), &StrategyParams::default()).unwrap();
    let after_first = &signals.as_slice()[1..];
    assert!(after_first.contains(&Signal::Buy));
    assert!(after_first.contains(&Signal::Sell));
}

#[test]
fn golden_is_deterministic() {
    let params = StrategyParams::default();
    let a = evaluate(&series(&GOLDEN_CLOSES), &params).unwrap();
    let b = evaluate(&series(&GOLDEN_CLOSES), &params).unwrap();
    assert_eq!(a.signals, b.signals);
    for (ra, rb) in a.frame.rows().iter().zip(b.frame.rows()) {
        assert_eq!(ra.macd.to_bits(), rb.macd.to_bits());
        assert_eq!(ra.macd_signal.to_bits(), rb.macd_signal.to_bits());
        assert_eq!(ra.rsi.map(f64::to_bits), rb.rsi.map(f64::to_bits));
        assert_eq!(ra.short_ma.to_bits(), rb.short_ma.to_bits());
    }
}

// ──────────────────────────────────────────────
// 2. Degenerate inputs
// ──────────────────────────────────────────────

#[test]
fn empty_series_yields_empty_signals() {
    let signals = classify(&[], &StrategyParams::default()).unwrap();
    assert!(signals.is_empty());
    assert_eq!(signals.current(), None);
}

#[test]
fn short_series_is_all_hold() {
    for closes in [vec![100.0], vec![0.0], vec![12_345.678]] {
        let signals = classify(&series(&closes), &StrategyParams::default()).unwrap();
        assert_eq!(signals.as_slice(), &[Signal::Hold]);
    }
}

#[test]
fn flat_price_is_all_hold() {
    let output = evaluate(&series(&[100.0; 5]), &StrategyParams::default()).unwrap();
    assert!(output.frame.rows().iter().all(|r| r.rsi.is_none()));
    assert!(output.frame.rows().iter().all(|r| r.macd == r.macd_signal));
    assert!(output.signals.iter().all(|s| *s == Signal::Hold));
}

#[test]
fn flat_price_is_all_hold_in_confluence_mode() {
    let params = StrategyParams::default().with_mode(ClassifierMode::MaConfluence);
    let signals = classify(&series(&[42.0; 30]), &params).unwrap();
    assert!(signals.iter().all(|s| *s == Signal::Hold));
}

// ──────────────────────────────────────────────
// 3. Threshold exactness
// ──────────────────────────────────────────────

#[test]
fn rsi_exactly_thirty_does_not_force_buy() {
    let output = evaluate(&series(&[100.0, 103.0, 96.0]), &StrategyParams::default()).unwrap();
    assert_eq!(output.frame.rows()[2].rsi, Some(30.0));
    // MACD has dropped below its signal line; the RSI rule abstains at 30.
    assert_eq!(output.signals.get(2), Some(Signal::Sell));
}

#[test]
fn rsi_exactly_seventy_does_not_force_sell() {
    let output = evaluate(&series(&[100.0, 107.0, 104.0]), &StrategyParams::default()).unwrap();
    assert_eq!(output.frame.rows()[2].rsi, Some(70.0));
    // MACD still above its signal line; no bullish divergence at RSI == 70.
    assert_eq!(output.signals.get(2), Some(Signal::Buy));
}

// ──────────────────────────────────────────────
// 4. Override precedence on computed indicators
// ──────────────────────────────────────────────

#[test]
fn bearish_divergence_overrides_macd_on_real_series() {
    // Golden index 13: MACD -0.194 < signal 0.300 (SELL), RSI 46 (abstains),
    // MACD falling below zero while RSI rises → bearish divergence.
    let engine = StrategyEngine::new(StrategyParams::default()).unwrap();
    let output = engine.evaluate(&series(&GOLDEN_CLOSES));
    let outcomes = engine.explain(&output.frame, 13);
    assert_eq!(outcomes[0].proposed, Some(Signal::Sell));
    assert_eq!(outcomes[1].proposed, None);
    assert_eq!(outcomes[2].rule, "divergence");
    assert_eq!(outcomes[2].proposed, Some(Signal::Sell));
}

#[test]
fn rsi_overrides_macd_on_real_series() {
    // Golden index 3: MACD above signal (BUY) but RSI 100 (SELL).
    let engine = StrategyEngine::new(StrategyParams::default()).unwrap();
    let output = engine.evaluate(&series(&GOLDEN_CLOSES));
    let outcomes = engine.explain(&output.frame, 3);
    assert_eq!(outcomes[0].proposed, Some(Signal::Buy));
    assert_eq!(outcomes[1].proposed, Some(Signal::Sell));
    assert_eq!(output.signals.get(3), Some(Signal::Sell));
}

#[test]
fn divergence_never_fires_on_first_bar() {
    let engine = StrategyEngine::new(StrategyParams::default()).unwrap();
    for closes in [vec![10.0, 9.0, 8.0], vec![10.0, 12.0, 11.0], vec![5.0]] {
        let output = engine.evaluate(&series(&closes));
        let outcomes = engine.explain(&output.frame, 0);
        assert_eq!(outcomes[2].rule, "divergence");
        assert_eq!(outcomes[2].proposed, None);
    }
}

// ──────────────────────────────────────────────
// 5. Preconditions
// ──────────────────────────────────────────────

#[test]
fn unordered_timestamps_are_not_reordered() {
    // Caller error: timestamps go backwards. The engine neither sorts nor
    // rejects; it processes bars in the order given.
    let mut input = series(&GOLDEN_CLOSES);
    input.swap(3, 7);
    let timestamps: Vec<_> = input.iter().map(|p| p.timestamp).collect();

    let output = evaluate(&input, &StrategyParams::default()).unwrap();
    assert_eq!(output.signals.len(), input.len());
    let frame_timestamps: Vec<_> = output.frame.rows().iter().map(|r| r.timestamp).collect();
    assert_eq!(frame_timestamps, timestamps);
}

#[test]
fn windows_longer_than_series_degrade_gracefully() {
    let params = StrategyParams::default().with_windows(IndicatorWindows {
        fast_window: 500,
        slow_window: 1000,
        signal_window: 300,
        rsi_window: 400,
        short_ma_window: 600,
        long_ma_window: 2000,
    });
    let output = evaluate(&series(&GOLDEN_CLOSES), &params).unwrap();
    assert_eq!(output.signals.len(), 20);
    assert!(output
        .frame
        .rows()
        .iter()
        .all(|r| r.macd.is_finite() && r.short_ma.is_finite() && r.long_ma.is_finite()));
}

#[test]
fn zero_window_is_invalid_configuration() {
    let params = StrategyParams::default().with_windows(IndicatorWindows {
        long_ma_window: 0,
        ..IndicatorWindows::default()
    });
    let err = classify(&series(&GOLDEN_CLOSES), &params).unwrap_err();
    assert!(err.to_string().contains("long_ma_window"));
}

// ──────────────────────────────────────────────
// 6. MA-confluence on computed indicators
// ──────────────────────────────────────────────

fn confluence_params() -> StrategyParams {
    StrategyParams::default()
        .with_mode(ClassifierMode::MaConfluence)
        .with_windows(IndicatorWindows {
            fast_window: 3,
            slow_window: 6,
            signal_window: 3,
            rsi_window: 5,
            short_ma_window: 5,
            long_ma_window: 30,
        })
}

/// 40 bars trending by `slope`, a gap of `gap`, then four bars stepping by `step`.
fn trend_gap_recovery(start: f64, slope: f64, gap: f64, step: f64) -> Vec<f64> {
    let mut closes: Vec<f64> = (0..40).map(|i| start + slope * i as f64).collect();
    closes.push(closes[39] + gap);
    for _ in 0..4 {
        let last = closes[closes.len() - 1];
        closes.push(last + step);
    }
    closes
}

#[test]
fn confluence_buys_a_dip_in_an_uptrend() {
    // Last bar: short MA 5 above long MA, RSI ~16.7, MACD 0.35 above signal.
    let closes = trend_gap_recovery(100.0, 2.0, -20.0, 1.0);
    let signals = classify(&series(&closes), &confluence_params()).unwrap();

    assert_eq!(signals.len(), 45);
    assert!(signals.as_slice()[..44].iter().all(|s| *s == Signal::Hold));
    assert_eq!(signals.current(), Some(Signal::Buy));
}

#[test]
fn confluence_sells_a_rally_in_a_downtrend() {
    let closes = trend_gap_recovery(300.0, -2.0, 20.0, -1.0);
    let signals = classify(&series(&closes), &confluence_params()).unwrap();

    assert!(signals.as_slice()[..44].iter().all(|s| *s == Signal::Hold));
    assert_eq!(signals.current(), Some(Signal::Sell));
}

#[test]
fn confluence_is_stricter_than_override() {
    // The steady uptrend pins RSI at 100, which override mode reads as SELL.
    let closes = trend_gap_recovery(100.0, 2.0, -20.0, 1.0);
    let override_signals = classify(
        &series(&closes),
        &confluence_params().with_mode(ClassifierMode::Override),
    )
    .unwrap();
    assert_eq!(override_signals.get(20), Some(Signal::Sell));

    let confluence = classify(&series(&closes), &confluence_params()).unwrap();
    assert_eq!(confluence.get(20), Some(Signal::Hold));
}
