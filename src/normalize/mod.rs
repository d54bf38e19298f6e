//! Raw aggregator records to canonical [`Market`]s.
//!
//! Normalization never fails: malformed fields were already defaulted at
//! deserialization time and records from unknown platforms are skipped.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::client::raw::{MarketStatus, RawEvent, RawGame, RawMarket, RawRecord, RawSeries};
use crate::model::{Market, Platform};
use crate::utils::math::price_to_probability;

mod games;

/// Normalizer with a fixed fallback timestamp for records that carry no
/// freshness time of their own.
#[derive(Clone, Debug)]
pub struct Normalizer {
    observed_at: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(observed_at: DateTime<Utc>) -> Self {
        Self {
            observed_at: observed_at.to_rfc3339(),
        }
    }

    /// Normalize a single record. No status filtering is applied.
    pub fn normalize(&self, record: &RawRecord) -> Vec<Market> {
        self.expand(record, false)
    }

    /// Normalize a batch, dropping markets whose status is not `open`.
    ///
    /// The status filter applies to top-level market records and to markets
    /// nested in events and series. Games carry no market status.
    pub fn normalize_all(&self, records: &[RawRecord]) -> Vec<Market> {
        let markets: Vec<Market> = records
            .iter()
            .flat_map(|record| self.expand(record, true))
            .collect();

        debug!(
            target: "normalizer",
            records = records.len(),
            markets = markets.len(),
            "batch normalized"
        );
        markets
    }

    fn expand(&self, record: &RawRecord, open_only: bool) -> Vec<Market> {
        match record {
            RawRecord::Market(raw) => {
                if open_only && !is_open(raw) {
                    return Vec::new();
                }
                self.market(raw).into_iter().collect()
            }
            RawRecord::Event(raw) => self.event_markets(raw, open_only),
            RawRecord::Series(raw) => self.series_markets(raw, open_only),
            RawRecord::Game(raw) => self.game(raw),
        }
    }

    /// `None` when the platform is not recognized.
    pub fn market(&self, raw: &RawMarket) -> Option<Market> {
        let platform = parse_platform(&raw.platform, &raw.id)?;
        Some(self.build_market(raw, platform))
    }

    pub fn event(&self, raw: &RawEvent) -> Vec<Market> {
        self.event_markets(raw, false)
    }

    pub fn series(&self, raw: &RawSeries) -> Vec<Market> {
        self.series_markets(raw, false)
    }

    pub fn game(&self, raw: &RawGame) -> Vec<Market> {
        games::normalize(raw, &self.observed_at)
    }

    fn build_market(&self, raw: &RawMarket, platform: Platform) -> Market {
        let probability = raw
            .current_prices
            .as_ref()
            .and_then(|prices| prices.yes.as_ref())
            .and_then(|yes| yes.price)
            .or(raw.probability)
            .map(price_to_probability)
            .unwrap_or(0.0);

        let link = non_empty(&raw.source_url)
            .or_else(|| non_empty(&raw.url))
            .map(str::to_string)
            .unwrap_or_else(|| platform.market_url(&raw.id));

        Market {
            id: raw.id.clone(),
            platform,
            original_title: raw.title.clone(),
            probability,
            volume: raw.volume_total.or(raw.volume_24h),
            liquidity: raw.liquidity,
            link,
            updated_at: self.freshness(&[&raw.last_synced_at, &raw.updated_at]),
            event_id: non_empty(&raw.event_id).map(str::to_string),
            event_name: non_empty(&raw.event_name).map(str::to_string),
            category: non_empty(&raw.category).map(str::to_string),
            tags: raw.tags.clone().unwrap_or_default(),
            volume_24h: raw.volume_24h,
            volume_7d: raw.volume_7d,
            open_interest: raw.open_interest,
            unique_traders: raw.unique_traders,
        }
    }

    fn event_markets(&self, raw: &RawEvent, open_only: bool) -> Vec<Market> {
        let nested = with_ids(&raw.markets);
        if nested.is_empty() {
            let Some(platform) = parse_platform(&raw.platform, &raw.id) else {
                return Vec::new();
            };
            return vec![Market {
                id: raw.id.clone(),
                platform,
                original_title: raw.title.clone(),
                probability: 0.0,
                volume: raw.total_volume,
                liquidity: None,
                link: platform.market_url(&raw.id),
                updated_at: self.freshness(&[&raw.last_synced_at]),
                event_id: Some(raw.id.clone()).filter(|id| !id.is_empty()),
                event_name: Some(raw.title.clone()).filter(|t| !t.is_empty()),
                category: None,
                tags: Vec::new(),
                volume_24h: None,
                volume_7d: None,
                open_interest: None,
                unique_traders: None,
            }];
        }

        nested
            .into_iter()
            .filter(|nested| !open_only || is_open(nested))
            .filter_map(|nested| {
                let platform = parse_platform(inherit(&nested.platform, &raw.platform), &nested.id)?;
                let mut market = self.build_market(nested, platform);
                if market.event_id.is_none() && !raw.id.is_empty() {
                    market.event_id = Some(raw.id.clone());
                }
                if market.event_name.is_none() && !raw.title.is_empty() {
                    market.event_name = Some(raw.title.clone());
                }
                Some(market)
            })
            .collect()
    }

    fn series_markets(&self, raw: &RawSeries, open_only: bool) -> Vec<Market> {
        let series_category = non_empty(&raw.category).map(str::to_string);

        let nested = with_ids(&raw.markets);
        if nested.is_empty() {
            let Some(platform) = parse_platform(&raw.platform, &raw.id) else {
                return Vec::new();
            };
            return vec![Market {
                id: raw.id.clone(),
                platform,
                original_title: raw.title.clone(),
                probability: 0.0,
                volume: None,
                liquidity: None,
                link: platform.market_url(&raw.id),
                updated_at: self.freshness(&[&raw.last_synced_at]),
                event_id: Some(raw.id.clone()).filter(|id| !id.is_empty()),
                event_name: Some(raw.title.clone()).filter(|t| !t.is_empty()),
                category: series_category,
                tags: raw.tags.clone().unwrap_or_default(),
                volume_24h: None,
                volume_7d: None,
                open_interest: None,
                unique_traders: None,
            }];
        }

        nested
            .into_iter()
            .filter(|nested| !open_only || is_open(nested))
            .filter_map(|nested| {
                let platform = parse_platform(inherit(&nested.platform, &raw.platform), &nested.id)?;
                let mut market = self.build_market(nested, platform);
                if market.event_id.is_none() && !raw.id.is_empty() {
                    market.event_id = Some(raw.id.clone());
                }
                if market.category.is_none() {
                    market.category = series_category.clone();
                }
                Some(market)
            })
            .collect()
    }

    fn freshness(&self, candidates: &[&Option<String>]) -> String {
        candidates
            .iter()
            .find_map(|c| non_empty(*c))
            .map(str::to_string)
            .unwrap_or_else(|| self.observed_at.clone())
    }
}

/// Normalize one record using the current time as fallback timestamp.
pub fn normalize(record: &RawRecord) -> Vec<Market> {
    Normalizer::new().normalize(record)
}

/// Normalize a batch, keeping only open markets.
pub fn normalize_all(records: &[RawRecord]) -> Vec<Market> {
    Normalizer::new().normalize_all(records)
}

pub fn normalize_market(raw: &RawMarket) -> Option<Market> {
    Normalizer::new().market(raw)
}

pub fn normalize_event(raw: &RawEvent) -> Vec<Market> {
    Normalizer::new().event(raw)
}

pub fn normalize_series(raw: &RawSeries) -> Vec<Market> {
    Normalizer::new().series(raw)
}

pub fn normalize_game(raw: &RawGame) -> Vec<Market> {
    Normalizer::new().game(raw)
}

/// Nested entries without an id are not usable markets.
fn with_ids(markets: &[RawMarket]) -> Vec<&RawMarket> {
    markets.iter().filter(|m| !m.id.is_empty()).collect()
}

fn is_open(raw: &RawMarket) -> bool {
    raw.status == Some(MarketStatus::Open)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Nested markets may omit their platform; fall back to the parent's.
fn inherit<'a>(own: &'a str, parent: &'a str) -> &'a str {
    if own.is_empty() {
        parent
    } else {
        own
    }
}

pub(crate) fn parse_platform(name: &str, record_id: &str) -> Option<Platform> {
    match name.parse::<Platform>() {
        Ok(platform) => Some(platform),
        Err(_) => {
            warn!(
                target: "normalizer",
                record_id = %record_id,
                platform = %name,
                "skipping record from unknown platform"
            );
            None
        }
    }
}
