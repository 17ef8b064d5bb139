//! Market data adapters.
//!
//! Each adapter turns a `(symbol, timeframe, limit)` request into an
//! oldest-first [`Series`]. Failures are returned as [`FetchError`]; the
//! signal engine decides what to do with them.

pub mod alphavantage;
pub mod binance;

pub use alphavantage::AlphaVantageFx;
pub use binance::BinanceKlines;

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::types::{MarketType, Series, Timeframe};

/// Timeout applied by the HTTP adapters.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Market data retrieval errors.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("no bars returned")]
    Empty,

    #[error("{0} API key is not configured")]
    MissingApiKey(&'static str),

    #[error("unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    #[error("timeframe {0} is not offered by this source")]
    UnsupportedTimeframe(Timeframe),

    #[error("no data source for {0} markets")]
    NoAdapter(&'static str),
}

/// A source of OHLC bars.
#[async_trait]
pub trait MarketDataAdapter: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent bars, oldest first.
    async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, FetchError>;
}

/// Picks the adapter for a market. The only place market type is branched on.
#[derive(Clone, Default)]
pub struct MarketRouter {
    adapters: HashMap<MarketType, Arc<dyn MarketDataAdapter>>,
}

impl MarketRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adapter(mut self, market: MarketType, adapter: Arc<dyn MarketDataAdapter>) -> Self {
        self.adapters.insert(market, adapter);
        self
    }

    pub fn adapter(&self, market: MarketType) -> Option<&Arc<dyn MarketDataAdapter>> {
        self.adapters.get(&market)
    }

    /// Registered source name per market.
    pub fn source_names(&self) -> BTreeMap<&'static str, String> {
        self.adapters
            .iter()
            .map(|(market, adapter)| (market.name(), adapter.name().to_string()))
            .collect()
    }

    /// Fetch from the adapter registered for `market`. Empty series are errors.
    pub async fn fetch(
        &self,
        market: MarketType,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, FetchError> {
        let adapter = self
            .adapter(market)
            .ok_or(FetchError::NoAdapter(market.name()))?;
        debug!("Fetching {} {} bars of {} from {}", limit, timeframe, symbol, adapter.name());
        let series = adapter.fetch(symbol, timeframe, limit).await?;
        if series.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricePoint;

    struct FixedSource {
        bars: usize,
    }

    #[async_trait]
    impl MarketDataAdapter for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch(
            &self,
            _symbol: &str,
            timeframe: Timeframe,
            _limit: usize,
        ) -> Result<Series, FetchError> {
            let points = (0..self.bars)
                .map(|i| PricePoint {
                    timestamp: i as i64,
                    open: 1.0,
                    high: 1.0,
                    low: 1.0,
                    close: 1.0,
                    volume: 0.0,
                })
                .collect();
            Ok(Series::new(timeframe, points))
        }
    }

    #[tokio::test]
    async fn test_router_dispatches_by_market() {
        let router = MarketRouter::new().with_adapter(MarketType::Crypto, Arc::new(FixedSource { bars: 3 }));

        let series = router
            .fetch(MarketType::Crypto, "BTC/USDT", Timeframe::OneHour, 100)
            .await
            .unwrap();
        assert_eq!(series.len(), 3);

        let missing = router
            .fetch(MarketType::Forex, "EUR/USD", Timeframe::OneHour, 100)
            .await;
        assert!(matches!(missing, Err(FetchError::NoAdapter("forex"))));
    }

    #[test]
    fn test_source_names() {
        let router = MarketRouter::new().with_adapter(MarketType::Crypto, Arc::new(FixedSource { bars: 1 }));
        let names = router.source_names();
        assert_eq!(names.len(), 1);
        assert_eq!(names.get("crypto").map(String::as_str), Some("fixed"));
    }

    #[tokio::test]
    async fn test_router_rejects_empty_series() {
        let router = MarketRouter::new().with_adapter(MarketType::Crypto, Arc::new(FixedSource { bars: 0 }));
        let result = router
            .fetch(MarketType::Crypto, "BTC/USDT", Timeframe::OneHour, 100)
            .await;
        assert!(matches!(result, Err(FetchError::Empty)));
    }

    #[test]
    fn test_fetch_error_messages() {
        assert_eq!(FetchError::Status(429).to_string(), "upstream returned HTTP 429");
        assert_eq!(
            FetchError::MissingApiKey("Alpha Vantage").to_string(),
            "Alpha Vantage API key is not configured"
        );
        assert_eq!(
            FetchError::UnsupportedTimeframe(Timeframe::FourHours).to_string(),
            "timeframe 4h is not offered by this source"
        );
    }
}
