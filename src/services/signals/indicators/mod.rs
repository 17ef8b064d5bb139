//! Technical indicator implementations.
//!
//! Every indicator is a pure function of its input series: no caching and
//! no state carried between calls.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use bollinger::{Bands, BollingerBands};
pub use ema::{ema_series, Ema};
pub use macd::{Macd, MacdSeries};
pub use rsi::{rolling_rsi, wilder_rsi, Rsi, RsiMethod};
pub use sma::sma;
