//! Creata - technical-analysis trading signal server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;
use tracing::info;

use config::Config;
use services::journal::{AppendOnlyLog, JournalError, JsonFileJournal};
use services::{ChatAssistant, SignalEngine};
use sources::{AlphaVantageFx, BinanceKlines, MarketRouter};
use types::MarketType;

// Re-export commonly used types
pub use types::*;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<SignalEngine>,
    pub chat: Arc<ChatAssistant>,
}

impl AppState {
    /// Wire the live data sources, the configured strategy and the file journal.
    pub fn from_config(config: Config) -> Result<Self, JournalError> {
        let router = MarketRouter::new()
            .with_adapter(
                MarketType::Crypto,
                Arc::new(BinanceKlines::new(config.binance_api_key.clone())),
            )
            .with_adapter(
                MarketType::Forex,
                Arc::new(AlphaVantageFx::new(config.alpha_vantage_api_key.clone())),
            );

        let journal = JsonFileJournal::new(config.journal_path.clone());
        journal.initialize()?;
        info!("Signal journal at {}", journal.path().display());

        Ok(Self::new(config, router, Arc::new(journal)))
    }

    /// Assemble state from explicit collaborators.
    pub fn new(config: Config, router: MarketRouter, journal: Arc<dyn AppendOnlyLog>) -> Self {
        let strategy = config.strategy.build(&config.strategy_params());
        info!("Using {} strategy ({})", strategy.id(), strategy.name());

        let engine = SignalEngine::new(router, strategy, journal)
            .with_candle_limit(config.candle_limit)
            .with_precision(config.price_precision);
        let chat = ChatAssistant::new(config.openai_api_key.clone(), config.openai_model.clone());

        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            chat: Arc::new(chat),
        }
    }
}
