use crate::model::Match;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Keep matches in `category` (unless `None` or `"all"`) whose title or any
/// tag contains `search`, case-insensitively. Order is preserved.
pub fn filter_matches(matches: Vec<Match>, category: Option<&str>, search: Option<&str>) -> Vec<Match> {
    let category = category.filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    matches
        .into_iter()
        .filter(|m| category.map_or(true, |c| m.event.category == c))
        .filter(|m| match &needle {
            None => true,
            Some(needle) => {
                m.event.normalized_title.to_lowercase().contains(needle.as_str())
                    || m.event.tags.iter().any(|t| t.to_lowercase().contains(needle.as_str()))
            }
        })
        .collect()
}
