//! Take-profit / stop-loss placement.

use crate::types::TradeSide;

/// Percentage distances from entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentTargets {
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
}

impl Default for PercentTargets {
    fn default() -> Self {
        Self {
            take_profit_pct: 2.0,
            stop_loss_pct: 1.0,
        }
    }
}

impl PercentTargets {
    fn targets(&self, side: TradeSide, close: f64) -> (f64, f64) {
        let tp = self.take_profit_pct / 100.0;
        let sl = self.stop_loss_pct / 100.0;
        match side {
            TradeSide::Long => (close * (1.0 + tp), close * (1.0 - sl)),
            TradeSide::Short => (close * (1.0 - tp), close * (1.0 + sl)),
        }
    }
}

/// How risk targets are derived for an entry signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskPolicy {
    /// Volatility-scaled: `close ± ATR * mult`. Falls back to percentages
    /// when ATR is undefined or zero.
    Atr {
        take_profit_mult: f64,
        stop_loss_mult: f64,
        fallback: PercentTargets,
    },
    /// Fixed percentages of the entry price.
    Percent(PercentTargets),
    /// Stop `risk_percent`% away, target `reward_ratio` times the risk.
    RiskReward { risk_percent: f64, reward_ratio: f64 },
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self::Atr {
            take_profit_mult: 2.0,
            stop_loss_mult: 1.5,
            fallback: PercentTargets::default(),
        }
    }
}

impl RiskPolicy {
    /// Returns `(take_profit, stop_loss)`.
    pub fn targets(&self, side: TradeSide, close: f64, atr: Option<f64>) -> (f64, f64) {
        match *self {
            RiskPolicy::Atr {
                take_profit_mult,
                stop_loss_mult,
                fallback,
            } => match atr.filter(|a| a.is_finite() && *a > 0.0) {
                Some(atr) => match side {
                    TradeSide::Long => (
                        close + atr * take_profit_mult,
                        close - atr * stop_loss_mult,
                    ),
                    TradeSide::Short => (
                        close - atr * take_profit_mult,
                        close + atr * stop_loss_mult,
                    ),
                },
                None => fallback.targets(side, close),
            },
            RiskPolicy::Percent(targets) => targets.targets(side, close),
            RiskPolicy::RiskReward {
                risk_percent,
                reward_ratio,
            } => {
                let risk = close * risk_percent / 100.0;
                match side {
                    TradeSide::Long => (close + risk * reward_ratio, close - risk),
                    TradeSide::Short => (close - risk * reward_ratio, close + risk),
                }
            }
        }
    }
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Round both targets to `decimals` places, keeping each at least one tick
/// on its own side of `close`.
pub fn round_targets(
    side: TradeSide,
    close: f64,
    take_profit: f64,
    stop_loss: f64,
    decimals: u32,
) -> (f64, f64) {
    let tick = 10f64.powi(-(decimals as i32));
    let entry = round_to(close, decimals);
    let above = round_to(entry + tick, decimals);
    let below = round_to(entry - tick, decimals);
    let take_profit = round_to(take_profit, decimals);
    let stop_loss = round_to(stop_loss, decimals);

    match side {
        TradeSide::Long => (take_profit.max(above), stop_loss.min(below)),
        TradeSide::Short => (take_profit.min(below), stop_loss.max(above)),
    }
}
