use crate::client::raw::{RawGame, RawGameListing};
use crate::model::{Market, Platform};
use crate::utils::math::price_to_probability;

use super::parse_platform;

const GAMES_BASE_URL: &str = "https://polyrouter.io/games";
const DEFAULT_CATEGORY: &str = "Sports";

/// One market per (listing, outcome). A listing without outcomes yields a
/// single unpriced market, a game without listings yields one Polymarket
/// market for the game itself.
pub(super) fn normalize(raw: &RawGame, observed_at: &str) -> Vec<Market> {
    let game_id = raw.game_id();
    let base = GameContext {
        game_id,
        title: &raw.title,
        category: raw
            .league
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_CATEGORY),
        updated_at: raw
            .scheduled_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(observed_at),
    };

    if raw.markets.is_empty() {
        return vec![base.market(
            game_id.to_string(),
            Platform::Polymarket,
            raw.title.clone(),
            0.0,
            None,
            base.fallback_link(),
        )];
    }

    let mut markets = Vec::new();
    for (listing_idx, listing) in raw.markets.iter().enumerate() {
        let Some(platform) = parse_platform(&listing.platform, game_id) else {
            continue;
        };
        let listing_key = listing_key(listing, listing_idx);
        let link = listing
            .event_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| platform.market_url(id))
            .unwrap_or_else(|| base.fallback_link());

        if listing.outcomes.is_empty() {
            markets.push(base.market(
                format!("{game_id}_{listing_key}"),
                platform,
                raw.title.clone(),
                0.0,
                None,
                link,
            ));
            continue;
        }

        for (outcome_idx, outcome) in listing.outcomes.iter().enumerate() {
            markets.push(base.market(
                format!("{game_id}_{listing_key}_{outcome_idx}"),
                platform,
                format!("{} - {}", raw.title, outcome.name),
                outcome.price.map(price_to_probability).unwrap_or(0.0),
                outcome.volume,
                link.clone(),
            ));
        }
    }
    markets
}

fn listing_key(listing: &RawGameListing, idx: usize) -> String {
    listing
        .event_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| idx.to_string())
}

struct GameContext<'a> {
    game_id: &'a str,
    title: &'a str,
    category: &'a str,
    updated_at: &'a str,
}

impl GameContext<'_> {
    fn fallback_link(&self) -> String {
        format!("{GAMES_BASE_URL}/{}", self.game_id)
    }

    fn market(
        &self,
        id: String,
        platform: Platform,
        title: String,
        probability: f64,
        volume: Option<f64>,
        link: String,
    ) -> Market {
        Market {
            id,
            platform,
            original_title: title,
            probability,
            volume,
            liquidity: None,
            link,
            updated_at: self.updated_at.to_string(),
            event_id: Some(self.game_id.to_string()).filter(|id| !id.is_empty()),
            event_name: Some(self.title.to_string()).filter(|t| !t.is_empty()),
            category: Some(self.category.to_string()),
            tags: Vec::new(),
            volume_24h: None,
            volume_7d: None,
            open_interest: None,
            unique_traders: None,
        }
    }
}
