//! Wire shapes returned by the PolyRouter aggregator.
//!
//! Every field is lenient: a missing or malformed value deserializes to its
//! default instead of rejecting the whole record.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, VecSkipError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Open,
    Closed,
    Resolved,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PriceSide {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub price: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub ask: Option<f64>,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CurrentPrices {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub yes: Option<PriceSide>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub no: Option<PriceSide>,
}

/// A single binary market listing.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawMarket {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub id: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub platform: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub event_name: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub title: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub status: Option<MarketStatus>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub source_url: Option<String>,
    /// Legacy link field.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub category: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub current_prices: Option<CurrentPrices>,
    /// Legacy probability, either 0-1 or 0-100.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub volume_total: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub volume_7d: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub liquidity: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub open_interest: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub unique_traders: Option<u64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub last_synced_at: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// An upstream event, optionally carrying its markets
/// (`with_nested_markets=true`).
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawEvent {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub id: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub platform: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub title: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub last_synced_at: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub total_volume: Option<f64>,
    /// Entries that are not market objects are skipped.
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawSeries {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub id: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub platform: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub title: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub category: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub last_synced_at: Option<String>,
    /// Entries that are not market objects are skipped.
    #[serde_as(as = "DefaultOnError<VecSkipError<_>>")]
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawGameOutcome {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub name: String,
    /// Either 0-1 or 0-100.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub price: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub volume: Option<f64>,
}

/// One platform's listing of a game.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawGameListing {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub platform: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde_as(as = "DefaultOnError<Vec<DefaultOnError>>")]
    #[serde(default)]
    pub outcomes: Vec<RawGameOutcome>,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawGame {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub polyrouter_id: Option<String>,
    /// Set by the details endpoint instead of `polyrouter_id`.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub title: String,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub league: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde_as(as = "DefaultOnError<Vec<DefaultOnError>>")]
    #[serde(default)]
    pub markets: Vec<RawGameListing>,
}

impl RawGame {
    pub fn game_id(&self) -> &str {
        self.polyrouter_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.id.as_deref())
            .unwrap_or("")
    }
}

/// Any raw record the normalizer accepts, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawRecord {
    Market(RawMarket),
    Event(RawEvent),
    Series(RawSeries),
    Game(RawGame),
}

impl From<RawMarket> for RawRecord {
    fn from(m: RawMarket) -> Self {
        RawRecord::Market(m)
    }
}

impl From<RawEvent> for RawRecord {
    fn from(e: RawEvent) -> Self {
        RawRecord::Event(e)
    }
}

impl From<RawSeries> for RawRecord {
    fn from(s: RawSeries) -> Self {
        RawRecord::Series(s)
    }
}

impl From<RawGame> for RawRecord {
    fn from(g: RawGame) -> Self {
        RawRecord::Game(g)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub next_offset: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub markets: Vec<RawMarket>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<RawEvent>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SeriesResponse {
    #[serde(default)]
    pub series: Vec<RawSeries>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GamesResponse {
    #[serde(default)]
    pub games: Vec<RawGame>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// `list-games` wraps its payload in `data`; tolerate both layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GamesEnvelope {
    Wrapped { data: GamesResponse },
    Bare(GamesResponse),
}

impl From<GamesEnvelope> for GamesResponse {
    fn from(envelope: GamesEnvelope) -> Self {
        match envelope {
            GamesEnvelope::Wrapped { data } => data,
            GamesEnvelope::Bare(resp) => resp,
        }
    }
}
