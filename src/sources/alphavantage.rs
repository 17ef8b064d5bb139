//! Alpha Vantage FX time series.
//!
//! Intraday bars come from `FX_INTRADAY`, daily bars from `FX_DAILY`.
//! Free tier keys are heavily rate limited (25 requests/day), and a
//! throttled request still returns HTTP 200 with a `Note` or
//! `Information` message instead of data.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::{FetchError, MarketDataAdapter, REQUEST_TIMEOUT};
use crate::types::{PricePoint, Series, Timeframe};

const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";

/// Bars returned by `outputsize=compact`.
const COMPACT_SIZE: usize = 100;

/// One bar of an FX time series. FX series carry no volume.
#[derive(Debug, Clone, Deserialize)]
struct FxBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

/// Alpha Vantage FX client.
pub struct AlphaVantageFx {
    client: Client,
    api_key: Option<String>,
}

impl AlphaVantageFx {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .user_agent("Creata/1.0")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Split a currency pair into `(from, to)`.
    ///
    /// Accepts `EUR/USD`, `eur-usd`, `EURUSD` and the `EURUSD=X` ticker form.
    pub fn split_pair(pair: &str) -> Result<(String, String), FetchError> {
        let cleaned = pair.trim().trim_end_matches("=X").trim_end_matches("=x").to_uppercase();
        let (from, to) = match cleaned.split_once(|c| matches!(c, '/' | '-' | '_')) {
            Some((from, to)) => (from.to_string(), to.to_string()),
            None if cleaned.len() == 6 && cleaned.is_ascii() => (cleaned[..3].to_string(), cleaned[3..].to_string()),
            None => return Err(FetchError::UnsupportedSymbol(pair.to_string())),
        };

        let is_code = |s: &str| s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic());
        if !is_code(&from) || !is_code(&to) {
            return Err(FetchError::UnsupportedSymbol(pair.to_string()));
        }
        Ok((from, to))
    }

    /// API function and interval parameter for a timeframe.
    fn function_for(timeframe: Timeframe) -> Result<(&'static str, Option<&'static str>), FetchError> {
        match timeframe {
            Timeframe::OneMinute => Ok(("FX_INTRADAY", Some("1min"))),
            Timeframe::FiveMinutes => Ok(("FX_INTRADAY", Some("5min"))),
            Timeframe::FifteenMinutes => Ok(("FX_INTRADAY", Some("15min"))),
            Timeframe::ThirtyMinutes => Ok(("FX_INTRADAY", Some("30min"))),
            Timeframe::OneHour => Ok(("FX_INTRADAY", Some("60min"))),
            Timeframe::OneDay => Ok(("FX_DAILY", None)),
            Timeframe::FourHours => Err(FetchError::UnsupportedTimeframe(timeframe)),
        }
    }

    /// Extract bars from a response body, oldest first.
    pub fn parse_response(body: &Value) -> Result<Vec<PricePoint>, FetchError> {
        let object = body
            .as_object()
            .ok_or_else(|| FetchError::Parse("response is not an object".into()))?;

        for key in ["Error Message", "Note", "Information"] {
            if let Some(message) = object.get(key).and_then(Value::as_str) {
                return Err(FetchError::Parse(message.to_string()));
            }
        }

        let series = object
            .iter()
            .find(|(key, _)| key.starts_with("Time Series FX"))
            .map(|(_, value)| value)
            .ok_or_else(|| FetchError::Parse("no FX time series in response".into()))?;

        let bars: HashMap<String, FxBar> = serde_json::from_value(series.clone())
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        let mut points = bars
            .into_iter()
            .map(|(time, bar)| {
                Ok(PricePoint {
                    timestamp: parse_timestamp(&time)?,
                    open: parse_price(&bar.open)?,
                    high: parse_price(&bar.high)?,
                    low: parse_price(&bar.low)?,
                    close: parse_price(&bar.close)?,
                    volume: 0.0,
                })
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }
}

/// Intraday keys are `YYYY-MM-DD HH:MM:SS` (UTC), daily keys are `YYYY-MM-DD`.
fn parse_timestamp(time: &str) -> Result<i64, FetchError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(time, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .ok_or_else(|| FetchError::Parse(format!("invalid bar time: {}", time)))
}

fn parse_price(s: &str) -> Result<f64, FetchError> {
    s.trim()
        .parse()
        .map_err(|_| FetchError::Parse(format!("invalid price: {}", s)))
}

#[async_trait]
impl MarketDataAdapter for AlphaVantageFx {
    fn name(&self) -> &str {
        "alphavantage"
    }

    async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(FetchError::MissingApiKey("Alpha Vantage"))?;
        let (from, to) = Self::split_pair(symbol)?;
        let (function, interval) = Self::function_for(timeframe)?;
        let output_size = if limit > COMPACT_SIZE { "full" } else { "compact" };

        let mut params = vec![
            ("function", function),
            ("from_symbol", from.as_str()),
            ("to_symbol", to.as_str()),
            ("outputsize", output_size),
            ("apikey", api_key),
        ];
        if let Some(interval) = interval {
            params.push(("interval", interval));
        }

        let response = self
            .client
            .get(ALPHA_VANTAGE_URL)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Alpha Vantage returned {} for {}/{}", status, from, to);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        let points = Self::parse_response(&body).map_err(|e| {
            warn!("Alpha Vantage {}/{}: {}", from, to, e);
            e
        })?;
        if points.is_empty() {
            return Err(FetchError::Empty);
        }

        debug!(
            "Alpha Vantage returned {} {} bars for {}/{}",
            points.len(),
            timeframe,
            from,
            to
        );

        let mut series = Series::new(timeframe, points);
        series.truncate_to_latest(limit);
        Ok(series)
    }
}
