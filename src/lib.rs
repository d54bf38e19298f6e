pub mod cache;
pub mod client;
pub mod matching;
pub mod model;
pub mod monitoring;
pub mod normalize;
pub mod service;
pub mod types;
pub mod utils;

pub use crate::matching::{find_matches, DEFAULT_THRESHOLD};
pub use crate::model::{Event, Market, Match, Platform};
pub use crate::normalize::{normalize, normalize_all, Normalizer};
pub use crate::types::*;
