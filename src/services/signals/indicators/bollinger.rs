//! Bollinger Bands indicator.

use super::sma::sma;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// Band values at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// Population standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }

    /// Bands over the trailing `period` prices.
    pub fn calculate(&self, prices: &[f64]) -> Option<Bands> {
        let middle = sma(prices, self.period)?;
        let window = &prices[prices.len() - self.period..];
        let std_dev = Self::std_dev(window, middle);

        Some(Bands {
            upper: middle + self.std_dev_multiplier * std_dev,
            middle,
            lower: middle - self.std_dev_multiplier * std_dev,
        })
    }
}
