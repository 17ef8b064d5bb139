//! Signal and analysis endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::extract::JsonOrDefault;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{Analysis, MarketType, Signal, Timeframe};
use crate::AppState;

/// Body of `POST /signal` and `POST /analyze`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SignalRequest {
    pub pair: Option<String>,
    /// Alias for `pair`.
    pub symbol: Option<String>,
    pub timeframe: Option<String>,
    pub market: Option<String>,
}

/// A request resolved against configured defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub pair: String,
    pub timeframe: Timeframe,
    pub market: MarketType,
}

impl SignalRequest {
    pub fn resolve(&self, config: &Config) -> Result<Target> {
        resolve_target(
            self.pair.as_deref().or(self.symbol.as_deref()),
            self.timeframe.as_deref(),
            self.market.as_deref(),
            config,
        )
    }
}

/// Fill in defaults and validate. Unknown timeframe or market strings are rejected.
pub fn resolve_target(
    pair: Option<&str>,
    timeframe: Option<&str>,
    market: Option<&str>,
    config: &Config,
) -> Result<Target> {
    let pair = pair
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(config.default_pair.as_str())
        .to_string();

    let timeframe = match timeframe {
        Some(tf) => Timeframe::from_str(tf)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported timeframe: {}", tf)))?,
        None => config.default_timeframe,
    };

    let market = match market {
        Some(m) => MarketType::from_str(m)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported market: {}", m)))?,
        None => MarketType::default(),
    };

    Ok(Target {
        pair,
        timeframe,
        market,
    })
}

/// Query for the GET report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub timeframe: Option<String>,
}

/// Create the signal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signal", post(create_signal))
        .route("/analyze", post(analyze))
        .route("/crypto/:symbol", get(crypto_report))
        .route("/forex/:base/:quote", get(forex_report))
}

/// Generate and journal a signal.
async fn create_signal(
    State(state): State<AppState>,
    JsonOrDefault(request): JsonOrDefault<SignalRequest>,
) -> Result<Json<Signal>> {
    let target = request.resolve(&state.config)?;

    let signal = state
        .engine
        .generate(&target.pair, target.timeframe, target.market)
        .await;
    Ok(Json(signal))
}

/// Detailed report for a pair.
async fn analyze(
    State(state): State<AppState>,
    JsonOrDefault(request): JsonOrDefault<SignalRequest>,
) -> Result<Json<Analysis>> {
    let target = request.resolve(&state.config)?;

    let analysis = state
        .engine
        .analyze(&target.pair, target.timeframe, target.market)
        .await;
    Ok(Json(analysis))
}

async fn crypto_report(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Analysis>> {
    report(&state, &symbol, query.timeframe.as_deref(), MarketType::Crypto).await
}

async fn forex_report(
    State(state): State<AppState>,
    Path((base, quote)): Path<(String, String)>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Analysis>> {
    let pair = format!("{}/{}", base.to_uppercase(), quote.to_uppercase());
    report(&state, &pair, query.timeframe.as_deref(), MarketType::Forex).await
}

async fn report(
    state: &AppState,
    pair: &str,
    timeframe: Option<&str>,
    market: MarketType,
) -> Result<Json<Analysis>> {
    let timeframe = match timeframe {
        Some(tf) => Timeframe::from_str(tf)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported timeframe: {}", tf)))?,
        None => Timeframe::OneHour,
    };
    Ok(Json(state.engine.analyze(pair, timeframe, market).await))
}
