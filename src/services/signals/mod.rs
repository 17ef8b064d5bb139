//! Trading signals service module.
//!
//! Indicator calculations, decision strategies, risk target placement and
//! the engine that ties them to market data and the journal.

pub mod analysis;
pub mod engine;
pub mod indicators;
pub mod risk;
pub mod snapshot;
pub mod strategy;

pub use analysis::{build_analysis, unavailable_analysis};
pub use engine::SignalEngine;
pub use risk::{round_targets, round_to, PercentTargets, RiskPolicy};
pub use snapshot::IndicatorSettings;
pub use strategy::{
    EmaRsiMacdStrategy, EmaRsiStrategy, RsiEmaRiskStrategy, Strategy, StrategyKind,
    StrategyParams, TrendTierStrategy,
};
