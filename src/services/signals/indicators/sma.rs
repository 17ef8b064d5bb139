//! Simple Moving Average (SMA).

/// Mean of the trailing `period` values, or `None` when there are fewer.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }

    let sum: f64 = values.iter().rev().take(period).sum();
    Some(sum / period as f64)
}
