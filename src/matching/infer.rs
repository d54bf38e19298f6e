use std::fmt;

use serde::{Deserialize, Serialize};

/// Human-facing event category inferred from a title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Politics,
    Crypto,
    Economy,
    Finance,
    Technology,
    Sports,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Politics => "Politics",
            Category::Crypto => "Crypto",
            Category::Economy => "Economy",
            Category::Finance => "Finance",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Politics, &["trump", "election", "president"]),
    (Category::Crypto, &["bitcoin", "crypto", "btc"]),
    (Category::Economy, &["fed", "rate", "recession"]),
    (Category::Finance, &["stock", "tesla", "nvidia"]),
    (Category::Technology, &["gpt", "ai", "iphone"]),
    (Category::Sports, &["olympics", "euro", "sport"]),
];

const TAG_KEYWORDS: &[&str] = &[
    "trump", "bitcoin", "btc", "fed", "tesla", "nvidia", "gpt", "ai", "election", "president",
    "crypto", "stock", "olympics", "euro",
];

/// Case-insensitive substring match, so "ai" also hits "rain".
pub fn infer_category(title: &str) -> Category {
    let lower = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Tags in vocabulary order, each with its first letter capitalized.
pub fn extract_tags(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .map(|k| capitalize(k))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
