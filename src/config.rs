use std::env;
use std::path::PathBuf;

use crate::services::signals::indicators::RsiMethod;
use crate::services::signals::{StrategyKind, StrategyParams};
use crate::types::Timeframe;

/// Risk target tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    /// ATR multiple for take profit (ATR strategies).
    pub atr_take_profit_mult: f64,
    /// ATR multiple for stop loss (ATR strategies).
    pub atr_stop_loss_mult: f64,
    /// Stop distance as a percent of entry (risk/reward strategy).
    pub risk_percent: f64,
    /// Target distance as a multiple of the stop distance.
    pub reward_ratio: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            atr_take_profit_mult: 2.0,
            atr_stop_loss_mult: 1.5,
            risk_percent: 1.0,
            reward_ratio: 2.0,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Signal journal file.
    pub journal_path: PathBuf,
    /// Decision strategy.
    pub strategy: StrategyKind,
    /// RSI smoothing.
    pub rsi_method: RsiMethod,
    /// Bars requested per signal.
    pub candle_limit: usize,
    /// Decimal places for take profit and stop loss.
    pub price_precision: u32,
    pub risk: RiskConfig,
    /// Pair used when a request names none.
    pub default_pair: String,
    /// Timeframe used when a request names none.
    pub default_timeframe: Timeframe,
    /// Binance API key (optional, klines are public).
    pub binance_api_key: Option<String>,
    /// Alpha Vantage API key, required for forex data.
    pub alpha_vantage_api_key: Option<String>,
    /// OpenAI API key. Chat replies are placeholders without it.
    pub openai_api_key: Option<String>,
    /// Chat completion model.
    pub openai_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            journal_path: PathBuf::from("signals.json"),
            strategy: StrategyKind::default(),
            rsi_method: RsiMethod::default(),
            candle_limit: 100,
            price_precision: 6,
            risk: RiskConfig::default(),
            default_pair: "BTC/USDT".to_string(),
            default_timeframe: Timeframe::OneHour,
            binance_api_key: None,
            alpha_vantage_api_key: None,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source. Unparseable values
    /// fall back to defaults, blank keys count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            journal_path: lookup("SIGNAL_JOURNAL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.journal_path),
            strategy: lookup("SIGNAL_STRATEGY")
                .and_then(|s| StrategyKind::from_str(&s))
                .unwrap_or(defaults.strategy),
            rsi_method: lookup("RSI_METHOD")
                .and_then(|s| RsiMethod::from_str(&s))
                .unwrap_or(defaults.rsi_method),
            candle_limit: lookup("CANDLE_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.candle_limit),
            price_precision: lookup("PRICE_PRECISION")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v <= 12)
                .unwrap_or(defaults.price_precision),
            risk: RiskConfig {
                atr_take_profit_mult: positive("ATR_TP_MULTIPLIER")
                    .unwrap_or(defaults.risk.atr_take_profit_mult),
                atr_stop_loss_mult: positive("ATR_SL_MULTIPLIER")
                    .unwrap_or(defaults.risk.atr_stop_loss_mult),
                risk_percent: positive("RISK_PERCENT")
                    .filter(|v| *v < 100.0)
                    .unwrap_or(defaults.risk.risk_percent),
                reward_ratio: positive("REWARD_RATIO")
                    .unwrap_or(defaults.risk.reward_ratio),
            },
            default_pair: lookup("DEFAULT_PAIR").unwrap_or(defaults.default_pair),
            default_timeframe: lookup("DEFAULT_TIMEFRAME")
                .and_then(|s| Timeframe::from_str(&s))
                .unwrap_or(defaults.default_timeframe),
            binance_api_key: secret("BINANCE_API_KEY"),
            alpha_vantage_api_key: secret("ALPHA_VANTAGE_API_KEY"),
            openai_api_key: secret("OPENAI_API_KEY"),
            openai_model: lookup("OPENAI_MODEL").unwrap_or(defaults.openai_model),
        }
    }

    /// Parameters for building the configured strategy.
    pub fn strategy_params(&self) -> StrategyParams {
        StrategyParams {
            rsi_method: self.rsi_method,
            atr_take_profit_mult: self.risk.atr_take_profit_mult,
            atr_stop_loss_mult: self.risk.atr_stop_loss_mult,
            risk_percent: self.risk.risk_percent,
            reward_ratio: self.risk.reward_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.journal_path, PathBuf::from("signals.json"));
        assert_eq!(config.strategy, StrategyKind::EmaRsiMacd);
        assert_eq!(config.rsi_method, RsiMethod::Wilder);
        assert_eq!(config.candle_limit, 100);
        assert_eq!(config.price_precision, 6);
        assert_eq!(config.risk, RiskConfig::default());
        assert_eq!(config.default_pair, "BTC/USDT");
        assert_eq!(config.default_timeframe, Timeframe::OneHour);
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_model, "gpt-4o-mini");
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("SIGNAL_JOURNAL_PATH", "/var/lib/creata/journal.json"),
            ("SIGNAL_STRATEGY", "trend_tiers"),
            ("RSI_METHOD", "rolling"),
            ("CANDLE_LIMIT", "250"),
            ("ATR_TP_MULTIPLIER", "3"),
            ("DEFAULT_TIMEFRAME", "4h"),
            ("OPENAI_API_KEY", "sk-test"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.journal_path, PathBuf::from("/var/lib/creata/journal.json"));
        assert_eq!(config.strategy, StrategyKind::TrendTiers);
        assert_eq!(config.rsi_method, RsiMethod::Rolling);
        assert_eq!(config.candle_limit, 250);
        assert_eq!(config.risk.atr_take_profit_mult, 3.0);
        assert_eq!(config.default_timeframe, Timeframe::FourHours);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("SIGNAL_STRATEGY", "martingale"),
            ("CANDLE_LIMIT", "0"),
            ("PRICE_PRECISION", "40"),
            ("DEFAULT_TIMEFRAME", "2h"),
            ("ALPHA_VANTAGE_API_KEY", "   "),
            ("ATR_TP_MULTIPLIER", "0"),
            ("ATR_SL_MULTIPLIER", "-1.5"),
            ("RISK_PERCENT", "100"),
            ("REWARD_RATIO", "NaN"),
        ]));
        assert_eq!(config.port, 5000);
        assert_eq!(config.strategy, StrategyKind::EmaRsiMacd);
        assert_eq!(config.candle_limit, 100);
        assert_eq!(config.price_precision, 6);
        assert_eq!(config.default_timeframe, Timeframe::OneHour);
        assert!(config.alpha_vantage_api_key.is_none());
        assert_eq!(config.risk, RiskConfig::default());

        let config = Config::from_lookup(lookup_from(&[
            ("ATR_SL_MULTIPLIER", "inf"),
            ("RISK_PERCENT", "-2"),
            ("REWARD_RATIO", "1.5"),
        ]));
        assert_eq!(config.risk.atr_stop_loss_mult, 1.5);
        assert_eq!(config.risk.risk_percent, 1.0);
        assert_eq!(config.risk.reward_ratio, 1.5);
    }

    #[test]
    fn test_strategy_params() {
        let config = Config {
            rsi_method: RsiMethod::Rolling,
            risk: RiskConfig {
                atr_take_profit_mult: 3.0,
                atr_stop_loss_mult: 1.0,
                risk_percent: 0.5,
                reward_ratio: 3.0,
            },
            ..Default::default()
        };
        let params = config.strategy_params();
        assert_eq!(params.rsi_method, RsiMethod::Rolling);
        assert_eq!(params.atr_take_profit_mult, 3.0);
        assert_eq!(params.atr_stop_loss_mult, 1.0);
        assert_eq!(params.risk_percent, 0.5);
        assert_eq!(params.reward_ratio, 3.0);
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            binance_api_key: Some("key".to_string()),
            ..Default::default()
        };
        let cloned = config.clone();
        assert_eq!(cloned.binance_api_key, config.binance_api_key);
        assert_eq!(cloned.port, config.port);
    }
}
