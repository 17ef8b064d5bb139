//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema_series;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD and signal lines, both oldest-first and each ending at the latest bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    pub fn latest(&self) -> (Option<f64>, Option<f64>) {
        (self.macd.last().copied(), self.signal.last().copied())
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Bars needed before the signal line has a value.
    pub fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    /// Compute both lines. The MACD line exists from `slow_period` bars on;
    /// the signal line may still be empty.
    pub fn calculate(&self, prices: &[f64]) -> MacdSeries {
        if self.fast_period > self.slow_period {
            return MacdSeries::default();
        }

        let fast_ema = ema_series(prices, self.fast_period);
        let slow_ema = ema_series(prices, self.slow_period);

        if fast_ema.is_empty() || slow_ema.is_empty() {
            return MacdSeries::default();
        }

        // Align the EMAs (fast starts earlier)
        let offset = self.slow_period - self.fast_period;
        let macd: Vec<f64> = fast_ema
            .iter()
            .skip(offset)
            .zip(slow_ema.iter())
            .map(|(f, s)| f - s)
            .collect();

        let signal = ema_series(&macd, self.signal_period);

        MacdSeries { macd, signal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(count: usize) -> Vec<f64> {
        let mut prices = vec![100.0];
        for i in 0..count - 1 {
            let step = if i % 2 == 0 { 2.0 } else { -1.0 };
            prices.push(prices[i] + step);
        }
        prices
    }

    #[test]
    fn test_macd_min_periods() {
        assert_eq!(Macd::default().min_periods(), 34);
    }

    #[test]
    fn test_macd_too_short() {
        let prices: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let series = Macd::default().calculate(&prices);
        assert!(series.macd.is_empty());
        assert_eq!(series.latest(), (None, None));
    }

    #[test]
    fn test_macd_line_without_signal() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = Macd::default().calculate(&prices);
        assert_eq!(series.macd.len(), 5);
        assert!(series.signal.is_empty());
        let (macd, signal) = series.latest();
        assert!((macd.unwrap() - 7.0).abs() < 1e-9);
        assert!(signal.is_none());
    }

    #[test]
    fn test_macd_signal_appears_at_min_periods() {
        let prices = zigzag(34);
        let series = Macd::default().calculate(&prices);
        assert_eq!(series.signal.len(), 1);
        assert_eq!(series.macd.len(), 9);
    }

    #[test]
    fn test_macd_uptrend_above_signal() {
        let series = Macd::default().calculate(&zigzag(60));
        let (macd, signal) = series.latest();
        assert!(macd.unwrap() > 0.0);
        assert!(macd.unwrap() > signal.unwrap());
    }

    #[test]
    fn test_macd_constant_prices_flat() {
        let series = Macd::default().calculate(&[50.0; 40]);
        let (macd, signal) = series.latest();
        assert!(macd.unwrap().abs() < 1e-9);
        assert!(signal.unwrap().abs() < 1e-9);
    }
}
