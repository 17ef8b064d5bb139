//! Builds an [`IndicatorSnapshot`] from a price series.

use super::indicators::{Atr, BollingerBands, Ema, Macd, Rsi, RsiMethod};
use crate::types::{IndicatorSnapshot, Series};

/// Indicator windows a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSettings {
    pub rsi: Rsi,
    pub ema_fast: Ema,
    pub ema_slow: Ema,
    pub macd: Macd,
    pub bollinger: BollingerBands,
    pub atr: Atr,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi: Rsi::default(),
            ema_fast: Ema::new(12),
            ema_slow: Ema::new(26),
            macd: Macd::default(),
            bollinger: BollingerBands::default(),
            atr: Atr::default(),
        }
    }
}

impl IndicatorSettings {
    pub fn with_rsi_method(mut self, method: RsiMethod) -> Self {
        self.rsi = Rsi::new(self.rsi.period(), method);
        self
    }

    pub fn with_emas(mut self, fast: usize, slow: usize) -> Self {
        self.ema_fast = Ema::new(fast);
        self.ema_slow = Ema::new(slow);
        self
    }

    /// Longest lookback among the configured indicators.
    pub fn min_periods(&self) -> usize {
        [
            self.rsi.min_periods(),
            self.ema_fast.min_periods(),
            self.ema_slow.min_periods(),
            self.macd.min_periods(),
            self.bollinger.min_periods(),
            self.atr.min_periods(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Compute every indicator at the latest bar of `series`.
    pub fn snapshot(&self, series: &Series) -> IndicatorSnapshot {
        let closes = series.closes();
        let macd = self.macd.calculate(&closes);
        let (macd_latest, signal_latest) = macd.latest();
        let bands = self.bollinger.calculate(&closes);

        IndicatorSnapshot {
            close: closes.last().copied(),
            rsi: self.rsi.calculate(&closes),
            ema_fast: self.ema_fast.calculate(&closes),
            ema_slow: self.ema_slow.calculate(&closes),
            macd: macd_latest,
            macd_signal: signal_latest,
            bb_high: bands.map(|b| b.upper),
            bb_low: bands.map(|b| b.lower),
            atr: self.atr.calculate(series.points()),
        }
    }
}
