//! Fetch, normalize, match and cache.

use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::MarketCache;
use crate::client::{
    ClientError, EventQuery, GamesQuery, MarketQuery, MarketSource, MarketStatus, RawRecord,
    SeriesQuery, MAX_MARKETS_LIMIT,
};
use crate::matching::{find_matches_with_report, MatchReport};
use crate::model::{Market, Match, Platform};
use crate::monitoring::Metrics;
use crate::normalize::Normalizer;
use crate::types::MatcherConfig;

/// Shortest accepted search query, in characters.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("search query must be at least 2 characters, got {0:?}")]
    InvalidQuery(String),

    #[error("failed to build cache key: {0}")]
    CacheKey(#[from] serde_json::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Upstream listing to run the pipeline on.
#[derive(Clone, Debug, PartialEq)]
pub enum Feed {
    Markets(MarketQuery),
    Events(EventQuery),
    Series(SeriesQuery),
    Games(GamesQuery),
}

impl Feed {
    pub fn name(&self) -> &'static str {
        match self {
            Feed::Markets(_) => "markets",
            Feed::Events(_) => "events",
            Feed::Series(_) => "series",
            Feed::Games(_) => "games",
        }
    }

    pub fn cache_key(&self) -> Result<String, serde_json::Error> {
        let query = match self {
            Feed::Markets(q) => serde_json::to_string(q)?,
            Feed::Events(q) => serde_json::to_string(q)?,
            Feed::Series(q) => serde_json::to_string(q)?,
            Feed::Games(q) => serde_json::to_string(q)?,
        };
        Ok(format!("{}:{query}", self.name()))
    }
}

pub struct MatchService<S> {
    source: S,
    cache: MarketCache<Vec<Match>>,
    metrics: Metrics,
    config: MatcherConfig,
}

impl<S: MarketSource> MatchService<S> {
    pub fn new(
        source: S,
        cache: MarketCache<Vec<Match>>,
        metrics: Metrics,
        config: MatcherConfig,
    ) -> Self {
        Self {
            source,
            cache,
            metrics,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn cache(&self) -> &MarketCache<Vec<Match>> {
        &self.cache
    }

    /// Matches for one feed, served from cache while fresh.
    pub async fn matches(&self, feed: &Feed) -> ServiceResult<Vec<Match>> {
        let key = feed.cache_key()?;
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let records = self.fetch(feed).await?;
        let report = self.run_pipeline(&records, self.config.threshold);
        self.cache.insert(key, report.matches.clone());
        Ok(report.matches)
    }

    /// Full-text search over open markets, matched at the stricter search
    /// threshold.
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<Match>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(ServiceError::InvalidQuery(query.to_string()));
        }

        let key = format!("search:{query}");
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let market_query = MarketQuery {
            status: Some(MarketStatus::Open),
            limit: Some(MAX_MARKETS_LIMIT),
            search: Some(query.to_string()),
            ..Default::default()
        };
        let records = self.fetch(&Feed::Markets(market_query)).await?;
        let report = self.run_pipeline(&records, self.config.search_threshold);
        self.cache.insert(key, report.matches.clone());
        Ok(report.matches)
    }

    /// Fetch open markets from each platform concurrently and match the union.
    pub async fn matches_across(
        &self,
        platforms: &[Platform],
        limit: u32,
    ) -> ServiceResult<Vec<Match>> {
        let queries: Vec<MarketQuery> = platforms
            .iter()
            .map(|&platform| MarketQuery {
                platform: Some(platform),
                status: Some(MarketStatus::Open),
                limit: Some(limit),
                ..Default::default()
            })
            .collect();

        let per_platform = try_join_all(queries.iter().map(|q| self.source.markets(q))).await?;

        let records: Vec<RawRecord> = per_platform
            .into_iter()
            .flatten()
            .map(RawRecord::from)
            .collect();
        self.metrics.record_fetch("markets", records.len());

        info!(
            target: "service",
            platforms = platforms.len(),
            records = records.len(),
            "fetched markets across platforms"
        );
        Ok(self.run_pipeline(&records, self.config.threshold).matches)
    }

    /// Normalized markets for a feed, without matching or caching.
    pub async fn markets(&self, feed: &Feed) -> ServiceResult<Vec<Market>> {
        let records = self.fetch(feed).await?;
        Ok(Normalizer::new().normalize_all(&records))
    }

    fn cached(&self, key: &str) -> Option<Vec<Match>> {
        let hit = self.cache.get(key);
        self.metrics.record_cache(key, hit.is_some());
        hit
    }

    async fn fetch(&self, feed: &Feed) -> ServiceResult<Vec<RawRecord>> {
        let records: Vec<RawRecord> = match feed {
            Feed::Markets(q) => into_records(self.source.markets(q).await?),
            Feed::Events(q) => into_records(self.source.events(q).await?),
            Feed::Series(q) => into_records(self.source.series(q).await?),
            Feed::Games(q) => into_records(self.source.games(q).await?),
        };
        self.metrics.record_fetch(feed.name(), records.len());
        Ok(records)
    }

    fn run_pipeline(&self, records: &[RawRecord], threshold: f64) -> MatchReport {
        let markets = Normalizer::new().normalize_all(records);
        let report = find_matches_with_report(&markets, Some(threshold));
        debug!(
            target: "service",
            records = records.len(),
            markets = markets.len(),
            matches = report.matches.len(),
            threshold,
            "pipeline finished"
        );
        self.metrics.record_pipeline(markets.len(), report.matches.len());
        report
    }
}

fn into_records<T: Into<RawRecord>>(items: Vec<T>) -> Vec<RawRecord> {
    items.into_iter().map(Into::into).collect()
}
