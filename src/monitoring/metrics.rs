use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info};

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs()
}

#[derive(Default)]
struct MetricsInner {
    records_fetched: AtomicU64,
    markets_normalized: AtomicU64,
    matches_found: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    last_event_ts: AtomicU64,
}

/// Pipeline counters backed by atomics so the handle can be cloned cheaply.
#[derive(Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&self) {
        self.inner
            .last_event_ts
            .store(now_unix_secs(), Ordering::Relaxed);
    }

    pub fn record_fetch(&self, feed: &str, records: usize) {
        self.inner
            .records_fetched
            .fetch_add(records as u64, Ordering::Relaxed);
        self.touch();

        debug!(
            target: "metrics",
            event = "fetch",
            feed = %feed,
            records,
            total_records = self.inner.records_fetched.load(Ordering::Relaxed),
            "records fetched"
        );
    }

    pub fn record_pipeline(&self, markets: usize, matches: usize) {
        self.inner
            .markets_normalized
            .fetch_add(markets as u64, Ordering::Relaxed);
        self.inner
            .matches_found
            .fetch_add(matches as u64, Ordering::Relaxed);
        self.touch();

        info!(
            target: "metrics",
            event = "pipeline",
            markets,
            matches,
            total_matches = self.inner.matches_found.load(Ordering::Relaxed),
            "pipeline run"
        );
    }

    pub fn record_cache(&self, key: &str, hit: bool) {
        let counter = if hit {
            &self.inner.cache_hits
        } else {
            &self.inner.cache_misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        debug!(target: "metrics", event = "cache", key = %key, hit, "cache lookup");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_fetched: self.inner.records_fetched.load(Ordering::Relaxed),
            markets_normalized: self.inner.markets_normalized.load(Ordering::Relaxed),
            matches_found: self.inner.matches_found.load(Ordering::Relaxed),
            cache_hits: self.inner.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.inner.cache_misses.load(Ordering::Relaxed),
            last_event_ts: self.inner.last_event_ts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of current metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub records_fetched: u64,
    pub markets_normalized: u64,
    pub matches_found: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub last_event_ts: u64,
}

pub fn log_metrics_snapshot(snapshot: &MetricsSnapshot) {
    info!(
        target: "metrics",
        event = "metrics_snapshot",
        records_fetched = snapshot.records_fetched,
        markets_normalized = snapshot.markets_normalized,
        matches_found = snapshot.matches_found,
        cache_hits = snapshot.cache_hits,
        cache_misses = snapshot.cache_misses,
        last_event_ts = snapshot.last_event_ts,
        "metrics snapshot"
    );
}
