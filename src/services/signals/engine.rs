//! Signal generation pipeline: fetch, compute indicators, decide, journal.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::analysis::{build_analysis, unavailable_analysis};
use super::risk::{round_targets, round_to};
use super::strategy::Strategy;
use crate::services::journal::AppendOnlyLog;
use crate::sources::MarketRouter;
use crate::types::{Analysis, JournalEntry, MarketType, Series, Signal, Timeframe};

/// Default number of bars requested per signal.
pub const DEFAULT_CANDLE_LIMIT: usize = 100;

/// Default decimal places for take-profit and stop-loss.
pub const DEFAULT_PRICE_PRECISION: u32 = 6;

/// Produces signals for pairs on demand.
///
/// Stateless apart from the journal: two calls over the same bars yield
/// the same action and targets.
pub struct SignalEngine {
    router: MarketRouter,
    strategy: Arc<dyn Strategy>,
    journal: Arc<dyn AppendOnlyLog>,
    candle_limit: usize,
    precision: u32,
}

impl SignalEngine {
    pub fn new(
        router: MarketRouter,
        strategy: Arc<dyn Strategy>,
        journal: Arc<dyn AppendOnlyLog>,
    ) -> Self {
        Self {
            router,
            strategy,
            journal,
            candle_limit: DEFAULT_CANDLE_LIMIT,
            precision: DEFAULT_PRICE_PRECISION,
        }
    }

    /// Bars requested from the data source. Never below what the strategy needs.
    pub fn with_candle_limit(mut self, limit: usize) -> Self {
        self.candle_limit = limit.max(self.strategy.min_periods());
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn router(&self) -> &MarketRouter {
        &self.router
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    pub fn journal(&self) -> &Arc<dyn AppendOnlyLog> {
        &self.journal
    }

    pub fn candle_limit(&self) -> usize {
        self.candle_limit
    }

    /// Generate and journal a signal for `pair`.
    ///
    /// Never fails: an unreachable source yields a `DATA_UNAVAILABLE`
    /// signal (not journaled) and a journal write failure is logged while
    /// the signal is still returned.
    pub async fn generate(&self, pair: &str, timeframe: Timeframe, market: MarketType) -> Signal {
        let series = match self
            .router
            .fetch(market, pair, timeframe, self.candle_limit)
            .await
        {
            Ok(series) => series,
            Err(e) => {
                warn!("No {} data for {} ({}): {}", market.name(), pair, timeframe, e);
                return Signal::unavailable(pair, timeframe);
            }
        };

        let signal = self.evaluate(pair, &series);
        info!(
            "{} {} -> {} (tp={:?}, sl={:?})",
            pair,
            timeframe,
            signal.action.label(),
            signal.take_profit,
            signal.stop_loss
        );

        let journal = Arc::clone(&self.journal);
        let entry = JournalEntry::new(signal.clone());
        match tokio::task::spawn_blocking(move || journal.append(&entry)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to journal signal for {}: {}", pair, e),
            Err(e) => warn!("Journal task for {} did not complete: {}", pair, e),
        }
        signal
    }

    /// Decide on an already fetched series. Pure apart from the timestamp.
    pub fn evaluate(&self, pair: &str, series: &Series) -> Signal {
        if series.is_empty() {
            return Signal::unavailable(pair, series.timeframe());
        }
        if series.len() < self.strategy.min_periods() {
            debug!(
                "{} has {} bars, {} needs {}",
                pair,
                series.len(),
                self.strategy.id(),
                self.strategy.min_periods()
            );
        }

        let snapshot = self.strategy.settings().snapshot(series);
        let decision = self.strategy.decide(&snapshot);

        let (take_profit, stop_loss) = match (
            decision.action.side(),
            snapshot.close,
            decision.take_profit,
            decision.stop_loss,
        ) {
            (Some(side), Some(close), Some(tp), Some(sl)) => {
                let (tp, sl) = round_targets(side, close, tp, sl, self.precision);
                (Some(tp), Some(sl))
            }
            _ => (
                decision.take_profit.map(|v| round_to(v, self.precision)),
                decision.stop_loss.map(|v| round_to(v, self.precision)),
            ),
        };

        Signal {
            pair: pair.to_string(),
            timeframe: series.timeframe(),
            action: decision.action,
            take_profit,
            stop_loss,
            timestamp: Utc::now(),
        }
    }

    /// Detailed report for `pair`. Not journaled.
    pub async fn analyze(&self, pair: &str, timeframe: Timeframe, market: MarketType) -> Analysis {
        match self
            .router
            .fetch(market, pair, timeframe, self.candle_limit)
            .await
        {
            Ok(series) => self.analyze_series(pair, &series),
            Err(e) => {
                warn!("No {} data for {} ({}): {}", market.name(), pair, timeframe, e);
                unavailable_analysis(pair, timeframe)
            }
        }
    }

    pub fn analyze_series(&self, pair: &str, series: &Series) -> Analysis {
        if series.is_empty() {
            return unavailable_analysis(pair, series.timeframe());
        }
        let snapshot = self.strategy.settings().snapshot(series);
        let decision = self.strategy.decide(&snapshot);
        build_analysis(pair, series.timeframe(), &snapshot, &decision, self.precision)
    }
}
