//! Decision strategies.
//!
//! A strategy reads one [`IndicatorSnapshot`] and returns one [`Decision`].
//! Null indicator values never satisfy a condition.

use std::sync::Arc;

use super::indicators::RsiMethod;
use super::risk::{PercentTargets, RiskPolicy};
use super::snapshot::IndicatorSettings;
use crate::types::{Decision, IndicatorSnapshot, SignalAction};

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;
const MIDLINE: f64 = 50.0;

/// Trait for signal decision strategies.
pub trait Strategy: Send + Sync {
    /// Unique identifier for this strategy.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Indicator windows this strategy needs.
    fn settings(&self) -> &IndicatorSettings;

    /// Minimum number of bars for every indicator to be defined.
    fn min_periods(&self) -> usize {
        self.settings().min_periods()
    }

    /// Turn the latest indicator values into a decision. Must be pure.
    fn decide(&self, snapshot: &IndicatorSnapshot) -> Decision;
}

fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn below(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn with_targets(
    action: SignalAction,
    risk: &RiskPolicy,
    snapshot: &IndicatorSnapshot,
) -> Decision {
    match (action.side(), snapshot.close) {
        (Some(side), Some(close)) => {
            let (take_profit, stop_loss) = risk.targets(side, close, snapshot.atr);
            Decision {
                action,
                take_profit: Some(take_profit),
                stop_loss: Some(stop_loss),
            }
        }
        _ => Decision::flat(action),
    }
}

/// EMA crossover confirmed by RSI and MACD, with ATR-scaled targets.
///
/// 1. `rsi < 30` and fast EMA above slow: strong buy (buy without tiers).
/// 2. `rsi > 70` and fast EMA below slow: strong sell (sell without tiers).
/// 3. Fast above slow, `rsi < 70`, MACD above its signal line: buy.
/// 4. Fast below slow, `rsi > 30`, MACD below its signal line: sell.
/// 5. Otherwise hold.
pub struct EmaRsiMacdStrategy {
    settings: IndicatorSettings,
    risk: RiskPolicy,
    tiers: bool,
}

impl Default for EmaRsiMacdStrategy {
    fn default() -> Self {
        Self::new(IndicatorSettings::default(), RiskPolicy::default(), false)
    }
}

impl EmaRsiMacdStrategy {
    pub fn new(settings: IndicatorSettings, risk: RiskPolicy, tiers: bool) -> Self {
        Self {
            settings,
            risk,
            tiers,
        }
    }

    fn action(&self, s: &IndicatorSnapshot) -> SignalAction {
        let rsi = s.rsi;
        let bullish_trend = above(s.ema_fast, s.ema_slow);
        let bearish_trend = below(s.ema_fast, s.ema_slow);

        if bullish_trend && below(rsi, Some(OVERSOLD)) {
            return if self.tiers {
                SignalAction::StrongBuy
            } else {
                SignalAction::Buy
            };
        }
        if bearish_trend && above(rsi, Some(OVERBOUGHT)) {
            return if self.tiers {
                SignalAction::StrongSell
            } else {
                SignalAction::Sell
            };
        }
        if bullish_trend && below(rsi, Some(OVERBOUGHT)) && above(s.macd, s.macd_signal) {
            return SignalAction::Buy;
        }
        if bearish_trend && above(rsi, Some(OVERSOLD)) && below(s.macd, s.macd_signal) {
            return SignalAction::Sell;
        }
        SignalAction::Hold
    }
}

impl Strategy for EmaRsiMacdStrategy {
    fn id(&self) -> &str {
        if self.tiers {
            "ema_rsi_macd_tiered"
        } else {
            "ema_rsi_macd"
        }
    }

    fn name(&self) -> &str {
        "EMA 12/26 + RSI + MACD"
    }

    fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    fn decide(&self, snapshot: &IndicatorSnapshot) -> Decision {
        with_targets(self.action(snapshot), &self.risk, snapshot)
    }
}

/// EMA 12/26 crossover filtered by RSI, with fixed percentage targets.
pub struct EmaRsiStrategy {
    settings: IndicatorSettings,
    risk: RiskPolicy,
}

impl Default for EmaRsiStrategy {
    fn default() -> Self {
        Self::new(
            IndicatorSettings::default(),
            RiskPolicy::Percent(PercentTargets::default()),
        )
    }
}

impl EmaRsiStrategy {
    pub fn new(settings: IndicatorSettings, risk: RiskPolicy) -> Self {
        Self { settings, risk }
    }
}

impl Strategy for EmaRsiStrategy {
    fn id(&self) -> &str {
        "ema_rsi"
    }

    fn name(&self) -> &str {
        "EMA 12/26 + RSI"
    }

    fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    fn min_periods(&self) -> usize {
        self.settings
            .rsi
            .min_periods()
            .max(self.settings.ema_slow.min_periods())
    }

    fn decide(&self, s: &IndicatorSnapshot) -> Decision {
        let action = if above(s.ema_fast, s.ema_slow) && below(s.rsi, Some(OVERBOUGHT)) {
            SignalAction::Buy
        } else if below(s.ema_fast, s.ema_slow) && above(s.rsi, Some(OVERSOLD)) {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        };
        with_targets(action, &self.risk, s)
    }
}

/// Mean-reversion entries: oversold above the EMA goes long, overbought
/// below it goes short. Waits while RSI or EMA is undefined.
///
/// Reads `ema_fast` as its single EMA (20 bars by default).
pub struct RsiEmaRiskStrategy {
    settings: IndicatorSettings,
    risk: RiskPolicy,
}

impl Default for RsiEmaRiskStrategy {
    fn default() -> Self {
        Self::new(
            IndicatorSettings::default(),
            RiskPolicy::RiskReward {
                risk_percent: 1.0,
                reward_ratio: 2.0,
            },
        )
    }
}

impl RsiEmaRiskStrategy {
    pub fn new(settings: IndicatorSettings, risk: RiskPolicy) -> Self {
        Self {
            settings: settings.with_emas(20, 20),
            risk,
        }
    }
}

impl Strategy for RsiEmaRiskStrategy {
    fn id(&self) -> &str {
        "rsi_ema_risk"
    }

    fn name(&self) -> &str {
        "RSI + EMA 20 risk/reward"
    }

    fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    fn min_periods(&self) -> usize {
        self.settings
            .rsi
            .min_periods()
            .max(self.settings.ema_fast.min_periods())
    }

    fn decide(&self, s: &IndicatorSnapshot) -> Decision {
        if s.rsi.is_none() || s.ema_fast.is_none() {
            return Decision::flat(SignalAction::Wait);
        }

        let action = if below(s.rsi, Some(OVERSOLD)) && above(s.close, s.ema_fast) {
            SignalAction::Long
        } else if above(s.rsi, Some(OVERBOUGHT)) && below(s.close, s.ema_fast) {
            SignalAction::Short
        } else {
            SignalAction::Hold
        };
        with_targets(action, &self.risk, s)
    }
}

/// EMA 20/50 trend with RSI strength tiers and ATR targets.
pub struct TrendTierStrategy {
    settings: IndicatorSettings,
    risk: RiskPolicy,
}

impl Default for TrendTierStrategy {
    fn default() -> Self {
        Self::new(
            IndicatorSettings::default().with_rsi_method(RsiMethod::Rolling),
            RiskPolicy::default(),
        )
    }
}

impl TrendTierStrategy {
    pub fn new(settings: IndicatorSettings, risk: RiskPolicy) -> Self {
        Self {
            settings: settings.with_emas(20, 50),
            risk,
        }
    }
}

impl Strategy for TrendTierStrategy {
    fn id(&self) -> &str {
        "trend_tiers"
    }

    fn name(&self) -> &str {
        "EMA 20/50 trend tiers"
    }

    fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    fn decide(&self, s: &IndicatorSnapshot) -> Decision {
        let bullish = above(s.ema_fast, s.ema_slow);
        let bearish = below(s.ema_fast, s.ema_slow);

        let action = if bullish && below(s.rsi, Some(OVERSOLD)) {
            SignalAction::StrongBuy
        } else if bearish && above(s.rsi, Some(OVERBOUGHT)) {
            SignalAction::StrongSell
        } else if bullish && below(s.rsi, Some(MIDLINE)) {
            SignalAction::Buy
        } else if bearish && above(s.rsi, Some(MIDLINE)) {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        };
        with_targets(action, &self.risk, s)
    }
}

/// Tunables shared by the strategy constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParams {
    pub rsi_method: RsiMethod,
    pub atr_take_profit_mult: f64,
    pub atr_stop_loss_mult: f64,
    pub risk_percent: f64,
    pub reward_ratio: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            rsi_method: RsiMethod::Wilder,
            atr_take_profit_mult: 2.0,
            atr_stop_loss_mult: 1.5,
            risk_percent: 1.0,
            reward_ratio: 2.0,
        }
    }
}

impl StrategyParams {
    fn atr_policy(&self) -> RiskPolicy {
        RiskPolicy::Atr {
            take_profit_mult: self.atr_take_profit_mult,
            stop_loss_mult: self.atr_stop_loss_mult,
            fallback: PercentTargets::default(),
        }
    }
}

/// Strategy selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    EmaRsiMacd,
    EmaRsiMacdTiered,
    EmaRsi,
    RsiEmaRisk,
    TrendTiers,
}

impl StrategyKind {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ema_rsi_macd" => Some(Self::EmaRsiMacd),
            "ema_rsi_macd_tiered" => Some(Self::EmaRsiMacdTiered),
            "ema_rsi" => Some(Self::EmaRsi),
            "rsi_ema_risk" => Some(Self::RsiEmaRisk),
            "trend_tiers" => Some(Self::TrendTiers),
            _ => None,
        }
    }

    pub fn build(&self, params: &StrategyParams) -> Arc<dyn Strategy> {
        let settings = IndicatorSettings::default().with_rsi_method(params.rsi_method);
        match self {
            Self::EmaRsiMacd => Arc::new(EmaRsiMacdStrategy::new(
                settings,
                params.atr_policy(),
                false,
            )),
            Self::EmaRsiMacdTiered => Arc::new(EmaRsiMacdStrategy::new(
                settings,
                params.atr_policy(),
                true,
            )),
            Self::EmaRsi => Arc::new(EmaRsiStrategy::new(
                settings,
                RiskPolicy::Percent(PercentTargets::default()),
            )),
            Self::RsiEmaRisk => Arc::new(RsiEmaRiskStrategy::new(
                settings,
                RiskPolicy::RiskReward {
                    risk_percent: params.risk_percent,
                    reward_ratio: params.reward_ratio,
                },
            )),
            Self::TrendTiers => Arc::new(TrendTierStrategy::new(
                IndicatorSettings::default().with_rsi_method(RsiMethod::Rolling),
                params.atr_policy(),
            )),
        }
    }
}
