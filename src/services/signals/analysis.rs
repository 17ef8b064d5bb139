//! Human-readable market report built from one indicator snapshot.

use chrono::Utc;

use super::risk::round_to;
use crate::types::{Analysis, Decision, IndicatorSnapshot, SignalAction, Timeframe, TradeSide};

const STOP_ATR_MULT: f64 = 1.5;
const FIRST_TARGET_ATR_MULT: f64 = 2.0;
const SECOND_TARGET_ATR_MULT: f64 = 4.0;

/// Build the report for `pair` from its latest snapshot and the strategy's decision.
///
/// Targets are placed on the side the recommendation trades; flat
/// recommendations use long-side placement. Prices are rounded to
/// `precision` decimals, percentages to two.
pub fn build_analysis(
    pair: &str,
    timeframe: Timeframe,
    snapshot: &IndicatorSnapshot,
    decision: &Decision,
    precision: u32,
) -> Analysis {
    let price = |v: Option<f64>| v.map(|v| round_to(v, precision));
    let side = decision.action.side().unwrap_or(TradeSide::Long);
    let levels = match (snapshot.close, snapshot.atr) {
        (Some(close), Some(atr)) if close > 0.0 && atr.is_finite() => {
            Some(Levels::new(side, close, atr))
        }
        _ => None,
    };

    let mut analysis = Analysis {
        pair: pair.to_string(),
        timeframe,
        recommendation: decision.action,
        current_price: price(snapshot.close),
        rsi: snapshot.rsi.map(|v| round_to(v, 2)),
        ema_fast: price(snapshot.ema_fast),
        ema_slow: price(snapshot.ema_slow),
        macd: price(snapshot.macd),
        macd_signal: price(snapshot.macd_signal),
        bb_high: price(snapshot.bb_high),
        bb_low: price(snapshot.bb_low),
        atr: price(snapshot.atr),
        stop_loss: price(levels.map(|l| l.stop_loss)),
        take_profit_1: price(levels.map(|l| l.take_profit_1)),
        take_profit_2: price(levels.map(|l| l.take_profit_2)),
        risk_pct: levels.map(|l| round_to(l.risk_pct, 2)),
        greed_pct: levels.map(|l| round_to(l.greed_pct, 2)),
        summary: String::new(),
        timestamp: Utc::now(),
    };
    analysis.summary = summarize(&analysis);
    analysis
}

/// Report for a pair whose data could not be fetched.
pub fn unavailable_analysis(pair: &str, timeframe: Timeframe) -> Analysis {
    let mut analysis = Analysis {
        pair: pair.to_string(),
        timeframe,
        recommendation: SignalAction::Unavailable,
        current_price: None,
        rsi: None,
        ema_fast: None,
        ema_slow: None,
        macd: None,
        macd_signal: None,
        bb_high: None,
        bb_low: None,
        atr: None,
        stop_loss: None,
        take_profit_1: None,
        take_profit_2: None,
        risk_pct: None,
        greed_pct: None,
        summary: String::new(),
        timestamp: Utc::now(),
    };
    analysis.summary = summarize(&analysis);
    analysis
}

#[derive(Debug, Clone, Copy)]
struct Levels {
    stop_loss: f64,
    take_profit_1: f64,
    take_profit_2: f64,
    risk_pct: f64,
    greed_pct: f64,
}

impl Levels {
    fn new(side: TradeSide, close: f64, atr: f64) -> Self {
        let direction = match side {
            TradeSide::Long => 1.0,
            TradeSide::Short => -1.0,
        };
        let take_profit_2 = close + direction * SECOND_TARGET_ATR_MULT * atr;
        Self {
            stop_loss: close - direction * STOP_ATR_MULT * atr,
            take_profit_1: close + direction * FIRST_TARGET_ATR_MULT * atr,
            take_profit_2,
            risk_pct: atr / close * 100.0,
            greed_pct: (take_profit_2 - close).abs() / close * 100.0,
        }
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn trend_label(a: &Analysis) -> &'static str {
    match (a.ema_fast, a.ema_slow) {
        (Some(fast), Some(slow)) if fast > slow => "uptrend (fast EMA above slow)",
        (Some(fast), Some(slow)) if fast < slow => "downtrend (fast EMA below slow)",
        (Some(_), Some(_)) => "flat trend",
        _ => "trend undetermined",
    }
}

fn momentum_label(rsi: Option<f64>) -> &'static str {
    match rsi {
        Some(r) if r < 30.0 => "oversold",
        Some(r) if r > 70.0 => "overbought",
        Some(_) => "neutral momentum",
        None => "momentum undetermined",
    }
}

fn summarize(a: &Analysis) -> String {
    if a.recommendation == SignalAction::Unavailable {
        return format!(
            "{} ({}): market data unavailable, no recommendation.",
            a.pair, a.timeframe
        );
    }

    let mut summary = format!(
        "{} ({}) at {}: {}. RSI {} is {}; {}.",
        a.pair,
        a.timeframe,
        fmt_opt(a.current_price),
        a.recommendation.label(),
        fmt_opt(a.rsi),
        momentum_label(a.rsi),
        trend_label(a),
    );
    if let (Some(sl), Some(tp1), Some(tp2)) = (a.stop_loss, a.take_profit_1, a.take_profit_2) {
        summary.push_str(&format!(
            " Stop loss {}, targets {} / {}. Volatility risk {}%, upside to second target {}%.",
            sl,
            tp1,
            tp2,
            fmt_opt(a.risk_pct),
            fmt_opt(a.greed_pct),
        ));
    }
    summary
}
