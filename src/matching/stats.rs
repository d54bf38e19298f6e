use std::collections::HashSet;

use crate::model::{Event, Match};
use crate::utils::math::positive_bounds;

/// Pricing summary for an event. Markets with probability `0` (unknown)
/// are left out of the bounds.
pub fn calculate_match(event: Event) -> Match {
    let (min_probability, max_probability) = positive_bounds(
        event
            .markets
            .iter()
            .filter(|m| m.has_known_probability())
            .map(|m| m.probability),
    );
    let platforms_count = event
        .markets
        .iter()
        .map(|m| m.platform)
        .collect::<HashSet<_>>()
        .len();

    Match {
        event_id: event.id.clone(),
        min_probability,
        max_probability,
        spread: max_probability - min_probability,
        platforms_count,
        event,
    }
}
