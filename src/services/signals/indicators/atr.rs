//! Average True Range (ATR) indicator.

use crate::types::PricePoint;

/// ATR (Average True Range) indicator.
///
/// Measures market volatility as the rolling mean of true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first bar has no previous close, so its true range is High-Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    /// Calculate True Range.
    fn true_range(current: &PricePoint, previous: Option<&PricePoint>) -> f64 {
        let hl = current.high - current.low;
        match previous {
            Some(previous) => {
                let hc = (current.high - previous.close).abs();
                let lc = (current.low - previous.close).abs();
                hl.max(hc).max(lc)
            }
            None => hl,
        }
    }

    /// ATR at the latest bar.
    pub fn calculate(&self, candles: &[PricePoint]) -> Option<f64> {
        if self.period == 0 || candles.len() < self.period {
            return None;
        }

        let start = candles.len() - self.period;
        let total: f64 = (start..candles.len())
            .map(|i| {
                let previous = i.checked_sub(1).map(|p| &candles[p]);
                Self::true_range(&candles[i], previous)
            })
            .sum();

        Some(total / self.period as f64)
    }
}
