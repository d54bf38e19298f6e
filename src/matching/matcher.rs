use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::model::{Event, Market, Match, Platform};

use super::infer::{extract_tags, infer_category};
use super::similarity::{event_id_for, similarity};
use super::stats::calculate_match;

/// Minimum title similarity for two markets to be grouped.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Matches plus how many of them came from each grouping phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchReport {
    pub matches: Vec<Match>,
    pub by_event_id: usize,
    pub by_similarity: usize,
}

/// Group markets that refer to the same event across platforms, ordered by
/// spread descending.
pub fn find_matches(markets: &[Market], threshold: Option<f64>) -> Vec<Match> {
    find_matches_with_report(markets, threshold).matches
}

pub fn find_matches_with_report(markets: &[Market], threshold: Option<f64>) -> MatchReport {
    let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);

    let mut per_platform: BTreeMap<Platform, usize> = BTreeMap::new();
    for m in markets {
        *per_platform.entry(m.platform).or_insert(0) += 1;
    }
    debug!(
        target: "matcher",
        markets = markets.len(),
        threshold,
        ?per_platform,
        "matching started"
    );

    let mut consumed = vec![false; markets.len()];
    let mut matches = Vec::new();

    // Phase 1: exact grouping by declared event id.
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for (idx, market) in markets.iter().enumerate() {
        let Some(event_id) = market.declared_event_id() else {
            continue;
        };
        match group_index.get(event_id).copied() {
            Some(g) => groups[g].1.push(idx),
            None => {
                group_index.insert(event_id, groups.len());
                groups.push((event_id, vec![idx]));
            }
        }
    }

    let mut by_event_id = 0;
    for (event_id, members) in &groups {
        if distinct_platforms(markets, members) < 2 {
            continue;
        }
        let m = calculate_match(build_event(markets, members));
        debug!(
            target: "matcher",
            event_id = %event_id,
            title = %m.event.normalized_title,
            members = members.len(),
            platforms = m.platforms_count,
            "event id match"
        );
        for &idx in members {
            consumed[idx] = true;
        }
        matches.push(m);
        by_event_id += 1;
    }

    // Phase 2: similarity grouping over what is left.
    let mut by_similarity = 0;
    for (idx, market) in markets.iter().enumerate() {
        if consumed[idx] {
            continue;
        }

        let mut members = vec![idx];
        for (other_idx, other) in markets.iter().enumerate() {
            if other_idx == idx || consumed[other_idx] || other.platform == market.platform {
                continue;
            }
            if conflicting_event_ids(market, other) {
                continue;
            }
            let score = similarity(&market.original_title, &other.original_title);
            if score >= threshold {
                members.push(other_idx);
            }
        }

        if distinct_platforms(markets, &members) < 2 {
            continue;
        }
        let m = calculate_match(build_event(markets, &members));
        debug!(
            target: "matcher",
            title = %m.event.normalized_title,
            members = members.len(),
            platforms = m.platforms_count,
            spread = m.spread,
            "similarity match"
        );
        for &member in &members {
            consumed[member] = true;
        }
        matches.push(m);
        by_similarity += 1;
    }

    matches.sort_by(|a, b| b.spread.total_cmp(&a.spread));

    info!(
        target: "matcher",
        markets = markets.len(),
        matches = matches.len(),
        by_event_id,
        by_similarity,
        "matching completed"
    );
    if matches.is_empty() && !markets.is_empty() {
        warn!(
            target: "matcher",
            markets = markets.len(),
            platforms = per_platform.len(),
            threshold,
            "no matches found"
        );
    }

    MatchReport {
        matches,
        by_event_id,
        by_similarity,
    }
}

fn conflicting_event_ids(a: &Market, b: &Market) -> bool {
    match (a.declared_event_id(), b.declared_event_id()) {
        (Some(x), Some(y)) => x != y,
        _ => false,
    }
}

fn distinct_platforms(markets: &[Market], members: &[usize]) -> usize {
    members
        .iter()
        .map(|&i| markets[i].platform)
        .collect::<HashSet<_>>()
        .len()
}

fn build_event(markets: &[Market], members: &[usize]) -> Event {
    let group: Vec<Market> = members.iter().map(|&i| markets[i].clone()).collect();
    let title = group
        .first()
        .map(|m| m.original_title.clone())
        .unwrap_or_default();

    let category = group
        .iter()
        .find_map(|m| m.category.as_deref().filter(|c| !c.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| infer_category(&title).to_string());

    Event {
        id: event_id_for(&title),
        tags: extract_tags(&title),
        category,
        description: None,
        resolution_date: None,
        normalized_title: title,
        markets: group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(id: &str, platform: Platform, title: &str, probability: f64) -> Market {
        Market {
            id: id.to_string(),
            platform,
            original_title: title.to_string(),
            probability,
            volume: None,
            liquidity: None,
            link: platform.market_url(id),
            updated_at: "2024-01-15T10:00:00Z".to_string(),
            event_id: None,
            event_name: None,
            category: None,
            tags: Vec::new(),
            volume_24h: None,
            volume_7d: None,
            open_interest: None,
            unique_traders: None,
        }
    }

    #[test]
    fn report_counts_each_phase() {
        let mut a = market("a", Platform::Polymarket, "Fed decision", 40.0);
        let mut b = market("b", Platform::Kalshi, "FOMC outcome", 45.0);
        a.event_id = Some("fomc-jan".to_string());
        b.event_id = Some("fomc-jan".to_string());
        let c = market("c", Platform::Polymarket, "Event A", 80.0);
        let d = market("d", Platform::Manifold, "Event A", 50.0);

        let report = find_matches_with_report(&[a, b, c, d], None);
        assert_eq!(report.by_event_id, 1);
        assert_eq!(report.by_similarity, 1);
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.matches[0].spread, 30.0);
    }

    #[test]
    fn inherits_member_category() {
        let a = market("a", Platform::Polymarket, "Will it snow in Paris?", 20.0);
        let mut b = market("b", Platform::Manifold, "Will it snow in Paris", 30.0);
        b.category = Some("Weather".to_string());

        let matches = find_matches(&[a, b], None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].event.category, "Weather");
        assert_eq!(matches[0].event.id, "will-it-snow-in-paris");
        assert_eq!(matches[0].event.normalized_title, "Will it snow in Paris?");
    }
}
