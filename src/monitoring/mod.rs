pub mod logger;
pub mod metrics;

pub use metrics::{log_metrics_snapshot, Metrics, MetricsSnapshot};
