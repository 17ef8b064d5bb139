use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::Timeframe;

/// Action carried by a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    StrongBuy,
    Buy,
    Long,
    Hold,
    Wait,
    Short,
    Sell,
    StrongSell,
    /// The data adapter failed or returned no bars.
    #[serde(rename = "DATA_UNAVAILABLE")]
    Unavailable,
}

impl SignalAction {
    /// Wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Long => "LONG",
            Self::Hold => "HOLD",
            Self::Wait => "WAIT",
            Self::Short => "SHORT",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
            Self::Unavailable => "DATA_UNAVAILABLE",
        }
    }

    /// Which side of the market the action opens, if any.
    pub fn side(&self) -> Option<TradeSide> {
        match self {
            Self::StrongBuy | Self::Buy | Self::Long => Some(TradeSide::Long),
            Self::StrongSell | Self::Sell | Self::Short => Some(TradeSide::Short),
            Self::Hold | Self::Wait | Self::Unavailable => None,
        }
    }
}

/// Direction of a position implied by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Long,
    Short,
}

/// Indicator values at the latest bar. `None` until enough history exists.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Close of the latest bar.
    pub close: Option<f64>,
    pub rsi: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_high: Option<f64>,
    pub bb_low: Option<f64>,
    pub atr: Option<f64>,
}

/// Output of a strategy before it is stamped with pair and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: SignalAction,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
}

impl Decision {
    /// A decision with no risk targets.
    pub fn flat(action: SignalAction) -> Self {
        Self {
            action,
            take_profit: None,
            stop_loss: None,
        }
    }
}

/// A computed trading signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub pair: String,
    pub timeframe: Timeframe,
    #[serde(rename = "signal")]
    pub action: SignalAction,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    /// Signal for a request the data adapter could not serve.
    pub fn unavailable(pair: &str, timeframe: Timeframe) -> Self {
        Self {
            pair: pair.to_string(),
            timeframe,
            action: SignalAction::Unavailable,
            take_profit: None,
            stop_loss: None,
            timestamp: Utc::now(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.action == SignalAction::Unavailable
    }

    /// Flat key/value view used to embed the signal in prompts.
    pub fn flat(&self) -> Map<String, Value> {
        let value = json!({
            "pair": self.pair,
            "timeframe": self.timeframe.as_str(),
            "signal": self.action.label(),
            "take_profit": self.take_profit,
            "stop_loss": self.stop_loss,
            "timestamp": self.timestamp.to_rfc3339(),
        });
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// A journaled signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    #[serde(flatten)]
    pub signal: Signal,
    /// When the entry was written.
    pub recorded_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(signal: Signal) -> Self {
        Self {
            signal,
            recorded_at: Utc::now(),
        }
    }
}

/// Detailed market report for a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub pair: String,
    pub timeframe: Timeframe,
    pub recommendation: SignalAction,
    pub current_price: Option<f64>,
    pub rsi: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_high: Option<f64>,
    pub bb_low: Option<f64>,
    pub atr: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit_1: Option<f64>,
    pub take_profit_2: Option<f64>,
    /// ATR as a percentage of price.
    pub risk_pct: Option<f64>,
    /// Distance to the second target as a percentage of price.
    pub greed_pct: Option<f64>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}
