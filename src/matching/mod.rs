//! Cross-platform grouping of normalized markets.

pub mod filter;
pub mod infer;
pub mod matcher;
pub mod similarity;
pub mod stats;

pub use filter::filter_matches;
pub use infer::{extract_tags, infer_category, Category};
pub use matcher::{find_matches, find_matches_with_report, MatchReport, DEFAULT_THRESHOLD};
pub use similarity::{event_id_for, normalize_title, similarity};
pub use stats::calculate_match;
