use std::collections::HashMap;

/// Maximum length of a synthetic event id.
pub const EVENT_ID_MAX_LEN: usize = 50;

/// Lowercase, keep ASCII word chars and whitespace, collapse whitespace runs.
pub fn normalize_title(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sørensen-Dice coefficient over character bigrams, whitespace ignored.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut first: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *first.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersection = 0usize;
    for pair in b.windows(2) {
        if let Some(count) = first.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                intersection += 1;
            }
        }
    }

    (2.0 * intersection as f64) / ((a.len() - 1) + (b.len() - 1)) as f64
}

/// Title similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a == b {
        return 1.0;
    }
    dice_coefficient(&a, &b)
}

/// Deterministic slug used as the id of a synthetic event.
pub fn event_id_for(title: &str) -> String {
    let slug = normalize_title(title).replace(' ', "-");
    let truncated: String = slug.chars().take(EVENT_ID_MAX_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}
