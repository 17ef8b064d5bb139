//! Chat endpoint.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::extract::JsonOrDefault;
use super::signal::resolve_target;
use crate::error::{AppError, Result};
use crate::types::Signal;
use crate::AppState;

/// Body of `POST /ask`.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    pub message: Option<String>,
    /// Alias for `message`.
    pub question: Option<String>,
    /// Pair whose latest signal is attached as context.
    pub pair: Option<String>,
    /// Alias for `pair`.
    pub symbol: Option<String>,
    pub timeframe: Option<String>,
    pub market: Option<String>,
}

impl AskRequest {
    /// The question text, if any non-blank one was sent.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.question.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    fn context_pair(&self) -> Option<&str> {
        self.pair
            .as_deref()
            .or(self.symbol.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ask", post(ask))
}

async fn ask(
    State(state): State<AppState>,
    JsonOrDefault(request): JsonOrDefault<AskRequest>,
) -> Result<Json<AskResponse>> {
    let question = request
        .text()
        .ok_or_else(|| AppError::BadRequest("No message provided".to_string()))?;

    let snapshot = match request.context_pair() {
        Some(pair) => match resolve_target(
            Some(pair),
            request.timeframe.as_deref(),
            request.market.as_deref(),
            &state.config,
        ) {
            Ok(target) => {
                debug!("Attaching {} {} signal to chat prompt", target.pair, target.timeframe);
                Some(
                    state
                        .engine
                        .generate(&target.pair, target.timeframe, target.market)
                        .await,
                )
            }
            Err(e) => {
                warn!("Skipping chat context for {}: {}", pair, e);
                Some(Signal::unavailable(pair, state.config.default_timeframe))
            }
        },
        None => None,
    };

    let response = state.chat.reply(question, snapshot.as_ref()).await?;
    Ok(Json(AskResponse { response }))
}
