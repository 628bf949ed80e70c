// =============================================================================
// Featurizer -- text cleaning and numeric feature extraction
// =============================================================================
//
// Runs before the signal engine. Cleans each post's text and attaches the
// numeric feature map the engine reads (keyword polarity counts, engagement
// score) plus structural features downstream consumers may use. The engine
// itself never recomputes any of these.
// =============================================================================

use std::collections::HashMap;

use chrono::{Datelike, Timelike};

use crate::types::{feature_keys, Post};

/// English + Hindi keywords counted toward bullish polarity.
const BULLISH_KEYWORDS: &[&str] = &[
    "buy", "long", "bullish", "up", "gain", "profit", "moon", "rocket",
    "खरीदें", "तेजी", "लाभ", "ऊपर",
];

/// English + Hindi keywords counted toward bearish polarity.
const BEARISH_KEYWORDS: &[&str] = &[
    "sell", "short", "bearish", "down", "loss", "crash", "dump",
    "बेचें", "मंदी", "नुकसान", "नीचे",
];

/// How many word-frequency features to attach per post.
const WORD_FREQ_LIMIT: usize = 10;

/// Clean and featurize every post in place: text is normalised and the
/// feature map is rebuilt.
pub fn process_posts(posts: &mut [Post]) {
    for post in posts {
        post.text = clean_text(&post.text);
        post.features = extract_features(post);
    }
}

/// Normalise raw post text: strip URLs, drop punctuation while keeping
/// letters, digits, and Devanagari marks, collapse whitespace, lowercase.
pub fn clean_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let without_urls: Vec<&str> = text
        .split_whitespace()
        .filter(|token| !token.starts_with("http://") && !token.starts_with("https://"))
        .collect();

    let filtered: String = without_urls
        .join(" ")
        .chars()
        .map(|c| {
            // Devanagari combining marks are not alphanumeric but belong to
            // the words they attach to.
            if c.is_alphanumeric() || c == '_' || ('\u{0900}'..='\u{097F}').contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect();

    filtered
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// Log-compressed engagement: reposts weigh double, replies 1.5x.
pub fn engagement_score(likes: u32, reposts: u32, replies: u32) -> f64 {
    let total = f64::from(likes) + 2.0 * f64::from(reposts) + 1.5 * f64::from(replies);
    (total + 1.0).log10()
}

/// Number of distinct keywords from `keywords` that occur in `text`,
/// case-insensitively. Multiple occurrences of one keyword count once.
pub fn keyword_count(text: &str, keywords: &[&str]) -> f64 {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| lower.contains(&keyword.to_lowercase()))
        .count() as f64
}

fn extract_features(post: &Post) -> HashMap<String, f64> {
    let mut features = HashMap::new();

    // Structural features.
    features.insert("length".to_string(), post.text.chars().count() as f64);
    features.insert(
        "word_count".to_string(),
        post.text.split_whitespace().count() as f64,
    );
    features.insert("tag_count".to_string(), post.tags.len() as f64);
    features.insert("mention_count".to_string(), post.mentions.len() as f64);

    // Engagement.
    features.insert(
        feature_keys::ENGAGEMENT_SCORE.to_string(),
        engagement_score(post.likes, post.reposts, post.replies),
    );

    // Time-of-day features.
    features.insert("hour_of_day".to_string(), f64::from(post.timestamp.hour()));
    features.insert(
        "day_of_week".to_string(),
        f64::from(post.timestamp.weekday().num_days_from_sunday()),
    );

    // Market polarity.
    features.insert(
        feature_keys::BULLISH_KEYWORDS.to_string(),
        keyword_count(&post.text, BULLISH_KEYWORDS),
    );
    features.insert(
        feature_keys::BEARISH_KEYWORDS.to_string(),
        keyword_count(&post.text, BEARISH_KEYWORDS),
    );

    // Plain word-frequency features over the cleaned text.
    for (word, freq) in word_frequencies(&post.text, WORD_FREQ_LIMIT) {
        features.insert(format!("freq_{word}"), freq);
    }

    features
}

/// Relative frequency of the first `limit` distinct words in `text`.
fn word_frequencies(text: &str, limit: usize) -> Vec<(String, f64)> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let total = words.len() as f64;
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in &words {
        match counts.iter_mut().find(|(w, _)| w == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word.to_string(), 1)),
        }
    }

    counts
        .into_iter()
        .take(limit)
        .map(|(word, n)| (word, n as f64 / total))
        .collect()
}
