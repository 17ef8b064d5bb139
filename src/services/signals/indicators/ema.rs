//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Seeded with the SMA of
/// the first `period` values, then `ema = price*k + ema*(1-k)` with
/// `k = 2/(period+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// EMA at the last value.
    pub fn calculate(&self, values: &[f64]) -> Option<f64> {
        ema_series(values, self.period).last().copied()
    }
}

/// EMA over `values`, one output per input starting at index `period - 1`.
///
/// Empty when there are fewer than `period` values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut ema = values.iter().take(period).sum::<f64>() / period as f64;

    let mut series = Vec::with_capacity(values.len() - period + 1);
    series.push(ema);
    for value in &values[period..] {
        ema = value * multiplier + ema * (1.0 - multiplier);
        series.push(ema);
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_insufficient_data() {
        let ema = Ema::new(12);
        assert!(ema.calculate(&[1.0; 11]).is_none());
        assert!(ema.calculate(&[1.0; 12]).is_some());
    }

    #[test]
    fn test_ema_seed_is_sma() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(Ema::new(5).calculate(&values), Some(3.0));
    }

    #[test]
    fn test_ema_constant_series_converges() {
        let values = vec![42.5; 60];
        for period in [1, 5, 12, 26, 50] {
            let value = Ema::new(period).calculate(&values).unwrap();
            assert!((value - 42.5).abs() < 1e-9, "period {} gave {}", period, value);
        }
    }

    #[test]
    fn test_ema_linear_series() {
        // For a linear series the EMA lags price by (period - 1) / 2 steps.
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        assert!((Ema::new(12).calculate(&values).unwrap() - 123.5).abs() < 1e-9);
        assert!((Ema::new(26).calculate(&values).unwrap() - 116.5).abs() < 1e-9);
    }

    #[test]
    fn test_ema_series_length() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        assert_eq!(ema_series(&values, 12).len(), 19);
        assert!(ema_series(&values, 0).is_empty());
        assert!(ema_series(&values, 31).is_empty());
    }
}
