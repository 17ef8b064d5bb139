use serde::{Deserialize, Serialize};

/// Market an instrument trades in. Decides which data adapter serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    #[default]
    Crypto,
    Forex,
}

impl MarketType {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Some(Self::Crypto),
            "forex" | "fx" => Some(Self::Forex),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Crypto => "crypto",
            Self::Forex => "forex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_type_from_str() {
        assert_eq!(MarketType::from_str("crypto"), Some(MarketType::Crypto));
        assert_eq!(MarketType::from_str("FX"), Some(MarketType::Forex));
        assert_eq!(MarketType::from_str("stocks"), None);
    }

    #[test]
    fn test_market_type_default() {
        assert_eq!(MarketType::default(), MarketType::Crypto);
    }
}
