//! Binance spot klines.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{FetchError, MarketDataAdapter, REQUEST_TIMEOUT};
use crate::error::excerpt;
use crate::types::{PricePoint, Series, Timeframe};

const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Largest `limit` the klines endpoint accepts.
const MAX_KLINES: usize = 1000;

/// Binance kline client for crypto pairs.
#[derive(Clone)]
pub struct BinanceKlines {
    client: Client,
    api_key: Option<String>,
}

impl BinanceKlines {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent("Creata/1.0")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }

    /// Exchange symbol for a pair: `BTC/USDT`, `btc-usdt` and `BTCUSDT` all map to `BTCUSDT`.
    pub fn exchange_symbol(pair: &str) -> Result<String, FetchError> {
        let symbol: String = pair
            .trim()
            .chars()
            .filter(|c| !matches!(c, '/' | '-' | '_' | ' '))
            .collect::<String>()
            .to_uppercase();

        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FetchError::UnsupportedSymbol(pair.to_string()));
        }
        Ok(symbol)
    }

    /// Convert raw kline arrays into bars.
    ///
    /// Each kline is `[open_time, "open", "high", "low", "close", "volume", ...]`.
    pub fn parse_klines(raw: &[Value]) -> Result<Vec<PricePoint>, FetchError> {
        raw.iter()
            .map(|kline| {
                let fields = kline
                    .as_array()
                    .filter(|f| f.len() >= 6)
                    .ok_or_else(|| FetchError::Parse(format!("malformed kline: {}", kline)))?;

                let timestamp = fields[0]
                    .as_i64()
                    .ok_or_else(|| FetchError::Parse("kline open time is not an integer".into()))?;

                Ok(PricePoint {
                    timestamp,
                    open: number(&fields[1])?,
                    high: number(&fields[2])?,
                    low: number(&fields[3])?,
                    close: number(&fields[4])?,
                    volume: number(&fields[5])?,
                })
            })
            .collect()
    }
}

/// Binance sends prices as strings; accept plain numbers too.
fn number(value: &Value) -> Result<f64, FetchError> {
    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| FetchError::Parse(format!("invalid number: {}", s))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FetchError::Parse(format!("invalid number: {}", n))),
        other => Err(FetchError::Parse(format!("invalid number: {}", other))),
    }
}

#[async_trait]
impl MarketDataAdapter for BinanceKlines {
    fn name(&self) -> &str {
        "binance"
    }

    async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, FetchError> {
        let exchange_symbol = Self::exchange_symbol(symbol)?;
        let limit = limit.clamp(1, MAX_KLINES);
        let url = format!("{}/klines", BINANCE_API_URL);

        let mut request = self.client.get(&url).query(&[
            ("symbol", exchange_symbol.as_str()),
            ("interval", timeframe.as_str()),
            ("limit", &limit.to_string()),
        ]);
        if let Some(ref key) = self.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Binance klines returned {} for {}: {}",
                status,
                exchange_symbol,
                excerpt(&text, 200)
            );
            return Err(FetchError::Status(status.as_u16()));
        }

        let raw: Vec<Value> = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        let points = Self::parse_klines(&raw)?;
        if points.is_empty() {
            return Err(FetchError::Empty);
        }

        debug!(
            "Binance returned {} {} bars for {}",
            points.len(),
            timeframe,
            exchange_symbol
        );

        let mut series = Series::new(timeframe, points);
        series.truncate_to_latest(limit);
        Ok(series)
    }
}
