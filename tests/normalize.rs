use chrono::{TimeZone, Utc};

use polymatch::client::RawRecord;
use polymatch::matching::find_matches;
use polymatch::{normalize, Normalizer, Platform};

fn records(json: &str) -> Vec<RawRecord> {
    serde_json::from_str(json).expect("valid record fixture")
}

fn normalizer() -> Normalizer {
    Normalizer::at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

const FEED: &str = r#"[
    {
        "kind": "market",
        "id": "pm-fed",
        "platform": "polymarket",
        "title": "Will the Fed cut rates in March?",
        "status": "open",
        "current_prices": {"yes": {"price": 0.42}, "no": {"price": 0.58}},
        "volume_total": 125000.5,
        "liquidity": 9000,
        "last_synced_at": "2024-03-01T11:59:00Z"
    },
    {
        "kind": "event",
        "id": "kx-fed",
        "platform": "kalshi",
        "title": "Fed rate decision",
        "markets": [
            {"id": "kx-fed-cut", "title": "Fed cuts rates in March", "status": "open", "probability": 0.47},
            {"id": "kx-fed-hike", "title": "Fed hikes rates in March", "status": "closed", "probability": 0.02}
        ]
    },
    {
        "kind": "market",
        "id": "mf-fed",
        "platform": "manifold",
        "title": "Fed cut in March",
        "status": "resolved",
        "probability": 0.5
    },
    {
        "kind": "market",
        "id": "bf-fed",
        "platform": "betfair",
        "title": "Fed cuts rates in March",
        "status": "open"
    }
]"#;

#[test]
fn batch_normalization_filters_and_fans_out() {
    let markets = normalizer().normalize_all(&records(FEED));
    let ids: Vec<&str> = markets.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["pm-fed", "kx-fed-cut"]);

    let pm = &markets[0];
    assert_eq!(pm.platform, Platform::Polymarket);
    assert_eq!(pm.probability, 42.0);
    assert_eq!(pm.volume, Some(125000.5));
    assert_eq!(pm.liquidity, Some(9000.0));
    assert_eq!(pm.link, "https://polymarket.com/event/pm-fed");
    assert_eq!(pm.updated_at, "2024-03-01T11:59:00Z");

    let kx = &markets[1];
    assert_eq!(kx.platform, Platform::Kalshi);
    assert_eq!(kx.probability, 47.0);
    assert_eq!(kx.event_id.as_deref(), Some("kx-fed"));
    assert_eq!(kx.event_name.as_deref(), Some("Fed rate decision"));
    assert_eq!(kx.updated_at, "2024-03-01T12:00:00+00:00");
}

#[test]
fn normalized_feed_matches_end_to_end() {
    let markets = normalizer().normalize_all(&records(FEED));
    let matches = find_matches(&markets, None);
    assert_eq!(matches.len(), 1);

    let m = &matches[0];
    assert_eq!(m.platforms_count, 2);
    assert_eq!(m.spread, 5.0);
    assert_eq!(m.event.category, "Economy");
    assert_eq!(m.event.tags, vec!["Fed"]);
    assert_eq!(m.event_id, "will-the-fed-cut-rates-in-march");

    let json = serde_json::to_value(m).unwrap();
    assert_eq!(json["eventId"], "will-the-fed-cut-rates-in-march");
    assert_eq!(json["platformsCount"], 2);
    assert_eq!(json["minProbability"], 42.0);
    let first = &json["event"]["markets"][0];
    assert_eq!(first["originalTitle"], "Will the Fed cut rates in March?");
    assert_eq!(first["platform"], "polymarket");
    assert!(first.get("eventId").is_none());
    let second = &json["event"]["markets"][1];
    assert!(second.get("liquidity").is_none());
    assert_eq!(second["eventId"], "kx-fed");
}

#[test]
fn single_record_normalization_skips_status_filter() {
    let all = records(FEED);
    assert_eq!(normalize(&all[2]).len(), 1);
    assert_eq!(normalize(&all[1]).len(), 2);
    assert!(normalize(&all[3]).is_empty());
}

#[test]
fn malformed_records_degrade_instead_of_failing() {
    let feed = records(
        r#"[
            {"kind": "market", "id": "x", "platform": "kalshi", "title": 42, "status": "open",
             "probability": "sixty", "volume_total": -1, "tags": "oops"},
            {"kind": "series", "id": "s", "platform": "manifold", "title": "Weekly jobs",
             "category": "Economy", "markets": [{"id": "s-1", "platform": "manifold", "title": "Jobs beat?", "status": "open"}, "bad"]}
        ]"#,
    );

    let markets = normalizer().normalize_all(&feed);
    let ids: Vec<&str> = markets.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["x", "s-1"]);
    assert_eq!(markets[0].original_title, "");
    assert_eq!(markets[0].probability, 0.0);
    assert!(markets[0].tags.is_empty());
    assert_eq!(markets[1].category.as_deref(), Some("Economy"));
    assert_eq!(markets[1].event_id.as_deref(), Some("s"));
}

#[test]
fn games_feed_fans_out_outcomes() {
    let feed = records(
        r#"[{
            "kind": "game",
            "polyrouter_id": "nba-lal-bos",
            "title": "Lakers at Celtics",
            "league": "nba",
            "scheduled_at": "2024-03-02T00:30:00Z",
            "markets": [
                {"platform": "polymarket", "event_id": "lal-bos", "outcomes": [
                    {"name": "Lakers", "price": 0.38}, {"name": "Celtics", "price": 0.62}
                ]},
                {"platform": "kalshi", "outcomes": [{"name": "Lakers", "price": 40}]}
            ]
        }]"#,
    );

    let markets = normalizer().normalize_all(&feed);
    assert_eq!(markets.len(), 3);
    assert_eq!(markets[0].id, "nba-lal-bos_lal-bos_0");
    assert_eq!(markets[0].original_title, "Lakers at Celtics - Lakers");
    assert_eq!(markets[2].id, "nba-lal-bos_1_0");
    assert_eq!(markets[2].probability, 40.0);

    // listings of one game share the game id, so they group across platforms
    let matches = find_matches(&markets, None);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].platforms_count, 2);
    assert_eq!(matches[0].event.category, "nba");
}

#[test]
fn per_variant_helpers_use_current_time_as_fallback() {
    use polymatch::client::{RawEvent, RawGame, RawMarket};
    use polymatch::normalize::{normalize_event, normalize_game, normalize_market};

    let market = normalize_market(&RawMarket {
        id: "m".to_string(),
        platform: "limitless".to_string(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(market.link, "https://limitless.com/market/m");
    assert!(chrono::DateTime::parse_from_rfc3339(&market.updated_at).is_ok());

    let event = normalize_event(&RawEvent {
        id: "e".to_string(),
        platform: "sxbet".to_string(),
        ..Default::default()
    });
    assert_eq!(event[0].platform, Platform::Sxbet);

    let game = normalize_game(&RawGame::default());
    assert_eq!(game.len(), 1);
    assert_eq!(game[0].link, "https://polyrouter.io/games/");
}

#[test]
fn junk_nested_entries_leave_the_event_itself() {
    let feed = records(
        r#"[
            {"kind": "event", "id": "e1", "platform": "polymarket", "title": "Fed decision", "markets": [7, "x"]},
            {"kind": "event", "id": "e2", "platform": "kalshi", "title": "Fed decision", "markets": [null, {}]}
        ]"#,
    );

    for record in &feed {
        let single = normalize(record);
        assert_eq!(single.len(), 1);
        assert!(!single[0].id.is_empty());
        assert_eq!(single[0].original_title, "Fed decision");
    }

    let markets = normalizer().normalize_all(&feed);
    let ids: Vec<&str> = markets.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["e1", "e2"]);

    // each keeps its own event id, so the two never share a blank-titled match
    assert!(find_matches(&markets, None).is_empty());
}

#[test]
fn activity_counters_keep_snake_case_names() {
    let feed = records(
        r#"[{"kind": "market", "id": "pm-v", "platform": "polymarket", "title": "Volume check",
             "status": "open", "volume_24h": 10.5, "volume_7d": 70, "open_interest": 3, "unique_traders": 12}]"#,
    );

    let markets = normalizer().normalize_all(&feed);
    let json = serde_json::to_value(&markets[0]).unwrap();
    assert_eq!(json["volume_24h"], 10.5);
    assert_eq!(json["volume_7d"], 70.0);
    assert_eq!(json["open_interest"], 3.0);
    assert_eq!(json["unique_traders"], 12);
    assert!(json.get("volume24h").is_none());
    assert_eq!(json["originalTitle"], "Volume check");
}
