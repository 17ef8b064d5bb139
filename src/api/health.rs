use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Id of the strategy producing signals.
    strategy: String,
    /// Whether `/ask` calls a model or returns placeholders.
    chat_enabled: bool,
    /// Data source per market.
    sources: BTreeMap<&'static str, String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        strategy: state.engine.strategy().id().to_string(),
        chat_enabled: state.chat.is_configured(),
        sources: state.engine.router().source_names(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
