//! Relative Strength Index (RSI) indicator.

use serde::{Deserialize, Serialize};

/// How average gains and losses are smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiMethod {
    /// Seed with a simple mean, then `avg = (avg*(n-1) + x)/n`.
    #[default]
    Wilder,
    /// Simple mean of the last `n` gains and losses.
    Rolling,
}

impl RsiMethod {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wilder" => Some(Self::Wilder),
            "rolling" | "sma" => Some(Self::Rolling),
            _ => None,
        }
    }
}

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rsi {
    period: usize,
    method: RsiMethod,
}

impl Default for Rsi {
    fn default() -> Self {
        Self {
            period: 14,
            method: RsiMethod::Wilder,
        }
    }
}

impl Rsi {
    pub fn new(period: usize, method: RsiMethod) -> Self {
        Self { period, method }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn min_periods(&self) -> usize {
        self.period + 1
    }

    /// RSI at the last price, or `None` when `prices.len() <= period`.
    pub fn calculate(&self, prices: &[f64]) -> Option<f64> {
        match self.method {
            RsiMethod::Wilder => wilder_rsi(prices, self.period),
            RsiMethod::Rolling => rolling_rsi(prices, self.period),
        }
    }
}

/// Split consecutive deltas into (gains, losses), both non-negative.
fn gains_and_losses(prices: &[f64]) -> (Vec<f64>, Vec<f64>) {
    prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, -change)
            }
        })
        .unzip()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Wilder-smoothed RSI.
pub fn wilder_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() <= period {
        return None;
    }

    let (gains, losses) = gains_and_losses(prices);

    let mut avg_gain = gains.iter().take(period).sum::<f64>() / period as f64;
    let mut avg_loss = losses.iter().take(period).sum::<f64>() / period as f64;

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
    }

    Some(rsi_from_averages(avg_gain, avg_loss))
}

/// RSI from plain rolling means of the last `period` gains and losses.
pub fn rolling_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() <= period {
        return None;
    }

    let (gains, losses) = gains_and_losses(prices);
    let avg_gain = gains.iter().rev().take(period).sum::<f64>() / period as f64;
    let avg_loss = losses.iter().rev().take(period).sum::<f64>() / period as f64;

    Some(rsi_from_averages(avg_gain, avg_loss))
}
