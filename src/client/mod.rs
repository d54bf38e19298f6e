use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::model::Platform;

pub mod polyrouter;
pub mod raw;

pub use polyrouter::PolyRouterClient;
pub use raw::{MarketStatus, RawEvent, RawGame, RawMarket, RawRecord, RawSeries};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Markets endpoint never returns more than this many rows per page.
pub const MAX_MARKETS_LIMIT: u32 = 25;
pub const DEFAULT_MARKETS_LIMIT: u32 = 5;
pub const DEFAULT_EVENTS_LIMIT: u32 = 10;
pub const DEFAULT_SERIES_LIMIT: u32 = 10;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MarketQuery {
    pub platform: Option<Platform>,
    pub status: Option<MarketStatus>,
    pub limit: Option<u32>,
    /// Takes precedence over `offset`.
    pub cursor: Option<String>,
    pub offset: Option<u32>,
    pub search: Option<String>,
}

impl MarketQuery {
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_MARKETS_LIMIT)
            .clamp(1, MAX_MARKETS_LIMIT)
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(platform) = self.platform {
            params.push(("platform", platform.to_string()));
        }
        if let Some(status) = self.status {
            let status = match status {
                MarketStatus::Open => "open",
                MarketStatus::Closed => "closed",
                MarketStatus::Resolved => "resolved",
            };
            params.push(("status", status.to_string()));
        }
        params.push(("limit", self.effective_limit().to_string()));
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        } else if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("query", search.clone()));
        }
        params
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EventQuery {
    pub platform: Option<Platform>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub search: Option<String>,
    pub with_nested_markets: bool,
}

impl EventQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(platform) = self.platform {
            params.push(("platform", platform.to_string()));
        }
        params.push(("limit", self.limit.unwrap_or(DEFAULT_EVENTS_LIMIT).to_string()));
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("query", search.clone()));
        }
        if self.with_nested_markets {
            params.push(("with_nested_markets", "true".to_string()));
        }
        params
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeriesQuery {
    pub platform: Option<Platform>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub search: Option<String>,
}

impl SeriesQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(platform) = self.platform {
            params.push(("platform", platform.to_string()));
        }
        params.push(("limit", self.limit.unwrap_or(DEFAULT_SERIES_LIMIT).to_string()));
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("query", search.clone()));
        }
        params
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GamesQuery {
    /// `nfl`, `nba`, `nhl` or `mlb`.
    pub league: String,
}

impl GamesQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![("league", self.league.clone())]
    }
}

/// Supplier of raw upstream records.
///
/// [`PolyRouterClient`] is the production implementation; tests plug in
/// in-memory fixtures.
pub trait MarketSource {
    fn markets(&self, query: &MarketQuery)
        -> impl Future<Output = ClientResult<Vec<RawMarket>>> + Send;

    fn events(&self, query: &EventQuery)
        -> impl Future<Output = ClientResult<Vec<RawEvent>>> + Send;

    fn series(&self, query: &SeriesQuery)
        -> impl Future<Output = ClientResult<Vec<RawSeries>>> + Send;

    fn games(&self, query: &GamesQuery) -> impl Future<Output = ClientResult<Vec<RawGame>>> + Send;
}
