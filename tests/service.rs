use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use polymatch::cache::MarketCache;
use polymatch::client::{
    ClientError, ClientResult, EventQuery, GamesQuery, MarketQuery, MarketSource, MarketStatus,
    RawEvent, RawGame, RawMarket, RawSeries, SeriesQuery,
};
use polymatch::monitoring::Metrics;
use polymatch::service::{Feed, MatchService, ServiceError};
use polymatch::types::MatcherConfig;
use polymatch::Platform;

/// In-memory source that counts upstream calls and records the queries it saw.
#[derive(Default)]
struct FakeSource {
    markets: Vec<RawMarket>,
    events: Vec<RawEvent>,
    calls: AtomicUsize,
    queries: Mutex<Vec<MarketQuery>>,
    fail: bool,
}

impl FakeSource {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarketSource for FakeSource {
    async fn markets(&self, query: &MarketQuery) -> ClientResult<Vec<RawMarket>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Config("upstream down".to_string()));
        }
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .markets
            .iter()
            .filter(|m| query.platform.map_or(true, |p| m.platform == p.as_str()))
            .cloned()
            .collect())
    }

    async fn events(&self, _query: &EventQuery) -> ClientResult<Vec<RawEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.events.clone())
    }

    async fn series(&self, _query: &SeriesQuery) -> ClientResult<Vec<RawSeries>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn games(&self, _query: &GamesQuery) -> ClientResult<Vec<RawGame>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

fn raw(id: &str, platform: &str, title: &str, probability: f64) -> RawMarket {
    RawMarket {
        id: id.to_string(),
        platform: platform.to_string(),
        title: title.to_string(),
        status: Some(MarketStatus::Open),
        probability: Some(probability),
        ..Default::default()
    }
}

fn fed_markets() -> Vec<RawMarket> {
    vec![
        raw("pm-1", "polymarket", "Will the Fed cut rates in March?", 0.42),
        raw("kx-1", "kalshi", "Fed cuts rates in March", 0.47),
        raw("mf-1", "manifold", "Ethereum above 5k", 0.3),
    ]
}

fn service(source: FakeSource) -> MatchService<FakeSource> {
    MatchService::new(
        source,
        MarketCache::default(),
        Metrics::new(),
        MatcherConfig::default(),
    )
}

#[tokio::test]
async fn second_identical_request_is_served_from_cache() {
    let svc = service(FakeSource {
        markets: fed_markets(),
        ..Default::default()
    });
    let feed = Feed::Markets(MarketQuery::default());

    let first = svc.matches(&feed).await.unwrap();
    let second = svc.matches(&feed).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);

    let snap = svc.metrics().snapshot();
    assert_eq!(snap.cache_misses, 1);
    assert_eq!(snap.cache_hits, 1);
    assert_eq!(snap.records_fetched, 3);
    assert_eq!(snap.matches_found, 1);
}

#[tokio::test]
async fn different_queries_use_separate_cache_entries() {
    let source = FakeSource {
        markets: fed_markets(),
        ..Default::default()
    };
    let svc = service(source);

    svc.matches(&Feed::Markets(MarketQuery::default())).await.unwrap();
    let kalshi_only = svc
        .matches(&Feed::Markets(MarketQuery {
            platform: Some(Platform::Kalshi),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert!(kalshi_only.is_empty());
    assert_eq!(svc.cache().len(), 2);
}

#[tokio::test]
async fn events_feed_matches_nested_markets() {
    let event = RawEvent {
        id: "kx-fed".to_string(),
        platform: "kalshi".to_string(),
        title: "Fed decision".to_string(),
        markets: vec![
            raw("kx-1", "kalshi", "Fed cuts rates in March", 0.47),
            raw("pm-1", "polymarket", "Will the Fed cut rates in March?", 0.42),
        ],
        ..Default::default()
    };
    let svc = service(FakeSource {
        events: vec![event],
        ..Default::default()
    });

    let matches = svc.matches(&Feed::Events(EventQuery::default())).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].event.markets.len(), 2);
}

#[tokio::test]
async fn short_search_query_is_rejected_without_fetching() {
    let svc = service(FakeSource::default());

    let err = svc.search(" a ").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidQuery(ref q) if q == "a"));
    assert_eq!(svc_calls(&svc), 0);
}

#[tokio::test]
async fn search_sends_open_query_and_caches() {
    let svc = service(FakeSource {
        markets: vec![
            raw("pm-1", "polymarket", "Fed cuts rates in March", 0.40),
            raw("kx-1", "kalshi", "Fed cuts rates in March?", 0.45),
            raw("mf-1", "manifold", "Will the Fed cut rates in March?", 0.50),
        ],
        ..Default::default()
    });

    let matches = svc.search("fed").await.unwrap();
    // the stricter search threshold leaves the paraphrased title out
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].event.markets.len(), 2);

    {
        let queries = svc.source().queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].status, Some(MarketStatus::Open));
        assert_eq!(queries[0].search.as_deref(), Some("fed"));
    }

    svc.search("fed").await.unwrap();
    assert_eq!(svc_calls(&svc), 1);
    assert!(svc.cache().get("search:fed").is_some());
}

#[tokio::test]
async fn matches_across_queries_every_platform() {
    let svc = service(FakeSource {
        markets: fed_markets(),
        ..Default::default()
    });

    let matches = svc
        .matches_across(&[Platform::Polymarket, Platform::Kalshi, Platform::Manifold], 10)
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].platforms_count, 2);
    assert_eq!(svc_calls(&svc), 3);
}

#[tokio::test]
async fn upstream_errors_propagate_and_are_not_cached() {
    let svc = service(FakeSource {
        fail: true,
        ..Default::default()
    });
    let feed = Feed::Markets(MarketQuery::default());

    assert!(matches!(
        svc.matches(&feed).await,
        Err(ServiceError::Client(ClientError::Config(_)))
    ));
    assert!(svc.cache().is_empty());
}

fn svc_calls(svc: &MatchService<FakeSource>) -> usize {
    svc.source().calls()
}

#[tokio::test]
async fn markets_returns_normalized_open_markets_uncached() {
    let mut closed = raw("kx-2", "kalshi", "Fed hikes rates in March", 0.05);
    closed.status = Some(MarketStatus::Closed);
    let mut markets = fed_markets();
    markets.push(closed);
    let svc = service(FakeSource {
        markets,
        ..Default::default()
    });

    let normalized = svc.markets(&Feed::Markets(MarketQuery::default())).await.unwrap();
    assert_eq!(normalized.len(), 3);
    assert_eq!(normalized[0].probability, 42.0);
    assert!(svc.cache().is_empty());
}
