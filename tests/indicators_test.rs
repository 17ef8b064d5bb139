//! Indicator properties over generated price paths.

mod common;

use common::*;
use creata::services::signals::indicators::{
    ema_series, rolling_rsi, wilder_rsi, Atr, BollingerBands, Ema, Macd, Rsi, RsiMethod,
};

fn wave(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + (i as f64 * 0.37).sin() * 8.0 + (i as f64 * 0.05))
        .collect()
}

fn paths() -> Vec<Vec<f64>> {
    vec![
        wave(120),
        rising_zigzag(),
        falling_zigzag(),
        linear_closes(50.0, 80),
        zigzag_closes(10.0, 0.5, -0.75, 90),
    ]
}

#[test]
fn test_rsi_bounded_on_all_paths() {
    for path in paths() {
        for method in [RsiMethod::Wilder, RsiMethod::Rolling] {
            let value = Rsi::new(14, method).calculate(&path).unwrap();
            assert!((0.0..=100.0).contains(&value), "{:?} gave {}", method, value);
        }
    }
}

#[test]
fn test_rsi_extremes() {
    let rising = linear_closes(100.0, 40);
    let falling: Vec<f64> = rising.iter().rev().copied().collect();
    assert_eq!(wilder_rsi(&rising, 14), Some(100.0));
    assert_eq!(wilder_rsi(&falling, 14), Some(0.0));
    assert_eq!(rolling_rsi(&falling, 14), Some(0.0));
}

#[test]
fn test_rsi_needs_one_more_bar_than_period() {
    let closes = wave(15);
    assert!(wilder_rsi(&closes[..14], 14).is_none());
    assert!(wilder_rsi(&closes, 14).is_some());
}

#[test]
fn test_rsi_methods_agree_on_seed_window() {
    let closes = wave(15);
    let wilder = wilder_rsi(&closes, 14).unwrap();
    let rolling = rolling_rsi(&closes, 14).unwrap();
    assert!((wilder - rolling).abs() < 1e-9);
}

#[test]
fn test_ema_stays_within_input_range() {
    for path in paths() {
        let min = path.iter().copied().fold(f64::INFINITY, f64::min);
        let max = path.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for period in [5, 12, 26] {
            for value in ema_series(&path, period) {
                assert!(value >= min - 1e-9 && value <= max + 1e-9);
            }
        }
    }
}

#[test]
fn test_ema_of_constant_is_constant() {
    let flat = vec![42.0; 30];
    assert!((Ema::new(12).calculate(&flat).unwrap() - 42.0).abs() < 1e-9);
    assert_eq!(ema_series(&flat, 26).len(), 5);
}

#[test]
fn test_macd_line_lengths() {
    let macd = Macd::default();
    for count in [25usize, 26, 33, 34, 60] {
        let lines = macd.calculate(&wave(count));
        assert_eq!(lines.macd.len(), count.saturating_sub(25));
        assert_eq!(lines.signal.len(), count.saturating_sub(33));
    }
    assert_eq!(macd.min_periods(), 34);
}

#[test]
fn test_macd_lines_end_together() {
    let lines = Macd::default().calculate(&wave(80));
    let (macd, signal) = lines.latest();
    assert_eq!(macd, lines.macd.last().copied());
    assert_eq!(signal, lines.signal.last().copied());
    assert_eq!(ema_series(&lines.macd, 9), lines.signal);
}

#[test]
fn test_bollinger_band_ordering() {
    let bb = BollingerBands::default();
    for path in paths() {
        let bands = bb.calculate(&path).unwrap();
        assert!(bands.lower <= bands.middle && bands.middle <= bands.upper);
    }

    let flat = bb.calculate(&[7.5; 20]).unwrap();
    assert_eq!(flat.upper, 7.5);
    assert_eq!(flat.lower, 7.5);
    assert!(bb.calculate(&[1.0; 19]).is_none());
}

#[test]
fn test_atr_positive_and_windowed() {
    let atr = Atr::default();
    for path in paths() {
        let value = atr.calculate(&bars(&path)).unwrap();
        assert!(value >= 2.0 - 1e-9, "high-low is 2 on every bar, got {}", value);
    }
    assert!(atr.calculate(&bars(&wave(13))).is_none());
    assert!(atr.calculate(&bars(&wave(14))).is_some());
}
