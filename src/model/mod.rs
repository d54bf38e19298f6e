use serde::{Deserialize, Serialize};

pub mod platform;

pub use platform::{Platform, UnknownPlatform};

/// Platform-normalized tradeable proposition.
///
/// `probability` is always on the 0-100 scale. A value of `0.0` means the
/// price is unknown, not a real 0% quote.
///
/// Fields serialize in camelCase, except the activity counters which keep
/// their upstream snake_case names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: String,
    pub platform: Platform,
    pub original_title: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<f64>,
    pub link: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "volume_24h", default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,
    #[serde(rename = "volume_7d", default, skip_serializing_if = "Option::is_none")]
    pub volume_7d: Option<f64>,
    #[serde(rename = "open_interest", default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
    #[serde(rename = "unique_traders", default, skip_serializing_if = "Option::is_none")]
    pub unique_traders: Option<u64>,
}

impl Market {
    /// Declared grouping key, ignoring empty strings.
    pub fn declared_event_id(&self) -> Option<&str> {
        self.event_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn has_known_probability(&self) -> bool {
        self.probability > 0.0
    }
}

/// Synthetic cross-platform grouping of markets believed to reference the
/// same real-world proposition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub normalized_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_date: Option<String>,
    pub markets: Vec<Market>,
}

/// An [`Event`] plus its cross-platform pricing summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub event_id: String,
    pub event: Event,
    pub min_probability: f64,
    pub max_probability: f64,
    /// `max_probability - min_probability`, in percentage points.
    pub spread: f64,
    pub platforms_count: usize,
}
