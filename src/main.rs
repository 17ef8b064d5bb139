use creata::{api, config::Config, AppState};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "creata=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting Creata server on {}:{}", config.host, config.port);

    if config.alpha_vantage_api_key.is_none() {
        warn!("ALPHA_VANTAGE_API_KEY not set, forex signals will be DATA_UNAVAILABLE");
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set, /ask returns placeholder replies");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config)?;

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Creata server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
