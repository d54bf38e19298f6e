use serde::Serialize;
use tracing::info;

use crate::matching::MatchReport;
use crate::types::AppConfig;

#[derive(Serialize)]
struct StartupLog<'a> {
    event: &'a str,
    api_url: &'a str,
    api_key_set: bool,
    threshold: f64,
    search_threshold: f64,
    cache_ttl_secs: u64,
}

pub fn log_startup(cfg: &AppConfig) {
    let payload = StartupLog {
        event: "startup",
        api_url: &cfg.api.base_url,
        api_key_set: !cfg.api.api_key.is_empty(),
        threshold: cfg.matcher.threshold,
        search_threshold: cfg.matcher.search_threshold,
        cache_ttl_secs: cfg.cache.ttl_secs,
    };
    info!(target: "polymatch", startup = serde_json::to_string(&payload).unwrap_or_default().as_str());
}

/// Top matches by spread, one line each.
pub fn log_match_summary(report: &MatchReport, top: usize) {
    info!(
        target: "polymatch",
        matches = report.matches.len(),
        by_event_id = report.by_event_id,
        by_similarity = report.by_similarity,
        "match summary"
    );
    for m in report.matches.iter().take(top) {
        info!(
            target: "polymatch",
            event_id = %m.event_id,
            title = %m.event.normalized_title,
            category = %m.event.category,
            platforms = m.platforms_count,
            spread = m.spread,
            "top match"
        );
    }
}
