pub mod chat;
pub mod extract;
pub mod health;
pub mod signal;

use crate::error::AppError;
use crate::AppState;
use axum::{http::Uri, Router};

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(signal::router())
        .merge(chat::router())
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
