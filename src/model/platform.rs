use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prediction-market venues reported by the upstream aggregator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Polymarket,
    Manifold,
    Kalshi,
    Limitless,
    Sxbet,
    Novig,
    Prophetx,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Polymarket,
        Platform::Manifold,
        Platform::Kalshi,
        Platform::Limitless,
        Platform::Sxbet,
        Platform::Novig,
        Platform::Prophetx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Polymarket => "polymarket",
            Platform::Manifold => "manifold",
            Platform::Kalshi => "kalshi",
            Platform::Limitless => "limitless",
            Platform::Sxbet => "sxbet",
            Platform::Novig => "novig",
            Platform::Prophetx => "prophetx",
        }
    }

    /// Human-facing name used in tables and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Polymarket => "Polymarket",
            Platform::Manifold => "Manifold",
            Platform::Kalshi => "Kalshi",
            Platform::Limitless => "Limitless",
            Platform::Sxbet => "SX Bet",
            Platform::Novig => "Novig",
            Platform::Prophetx => "ProphetX",
        }
    }

    /// Canonical listing URL for a market id on this platform.
    pub fn market_url(&self, id: &str) -> String {
        match self {
            Platform::Polymarket => format!("https://polymarket.com/event/{id}"),
            Platform::Manifold => format!("https://manifold.markets/{id}"),
            Platform::Kalshi => format!("https://kalshi.com/markets/{id}"),
            other => format!("https://{}.com/market/{id}", other.as_str()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform: {}", self.0)
    }
}

impl std::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

impl clap::ValueEnum for Platform {
    fn value_variants<'a>() -> &'a [Self] {
        &Platform::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Kalshi".parse::<Platform>(), Ok(Platform::Kalshi));
        assert_eq!(" polymarket ".parse::<Platform>(), Ok(Platform::Polymarket));
        assert!("betfair".parse::<Platform>().is_err());
    }

    #[test]
    fn market_url_templates() {
        assert_eq!(
            Platform::Polymarket.market_url("abc"),
            "https://polymarket.com/event/abc"
        );
        assert_eq!(
            Platform::Manifold.market_url("abc"),
            "https://manifold.markets/abc"
        );
        assert_eq!(
            Platform::Kalshi.market_url("abc"),
            "https://kalshi.com/markets/abc"
        );
        assert_eq!(
            Platform::Novig.market_url("abc"),
            "https://novig.com/market/abc"
        );
    }
}
