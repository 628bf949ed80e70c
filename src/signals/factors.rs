// =============================================================================
// Factor Scorer -- sentiment, volume, momentum, and confidence factors
// =============================================================================
//
// Pure, side-effect-free scoring functions over one symbol's matched posts
// and its history window. Degenerate denominators are floored rather than
// raised:
//   - elapsed hours and average rate:  max(1, ...)
//   - momentum standard deviation:     max(0.01, ...)
// A missing feature key always reads as 0.
// =============================================================================

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::types::{feature_keys, Post};

/// How many of the newest history entries feed the momentum baseline.
const MOMENTUM_LOOKBACK: usize = 10;

/// Mean engagement-weighted keyword polarity over the group.
///
/// Per post: `(bullish - bearish) * (1 + 0.1 * engagement)`. An empty group
/// scores 0, though the engine's minimum-evidence gate keeps that from
/// occurring in practice.
pub fn sentiment_score(posts: &[Post]) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }

    let total: f64 = posts
        .iter()
        .map(|post| {
            let bullish = post.feature(feature_keys::BULLISH_KEYWORDS);
            let bearish = post.feature(feature_keys::BEARISH_KEYWORDS);
            let engagement = post.feature(feature_keys::ENGAGEMENT_SCORE);
            (bullish - bearish) * (1.0 + 0.1 * engagement)
        })
        .sum();

    total / posts.len() as f64
}

/// Current posting rate relative to the group's own historical rate.
///
/// Posts within the last hour of `now` are "recent"; the rest are "older".
/// With no older posts there is nothing to compare against and the score is
/// the neutral baseline 1.0. Otherwise the older posts' per-hour rate is
/// measured from the earliest older timestamp up to `now`.
pub fn volume_score(posts: &[Post], now: DateTime<Utc>) -> f64 {
    let cutoff = now - Duration::hours(1);
    let (recent, older): (Vec<&Post>, Vec<&Post>) =
        posts.iter().partition(|post| post.timestamp > cutoff);

    if older.is_empty() {
        return 1.0;
    }

    let earliest = older
        .iter()
        .map(|post| post.timestamp)
        .min()
        .unwrap_or(now);
    let elapsed_hours = (now - earliest).num_seconds() as f64 / 3600.0;
    let average_rate = older.len() as f64 / elapsed_hours.max(1.0);

    recent.len() as f64 / average_rate.max(1.0)
}

/// Z-score of the current sentiment against the recent history window,
/// clipped to [-3, 3].
///
/// Requires at least 2 history entries; otherwise 0. Only the newest
/// `min(10, |history|)` entries form the baseline. The standard deviation is
/// the sample (n-1) estimator, floored at 0.01.
pub fn momentum_score(history: &[f64], current_sentiment: f64) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }

    let take = history.len().min(MOMENTUM_LOOKBACK);
    let recent = &history[history.len() - take..];
    if recent.len() < 2 {
        return 0.0;
    }

    let mean = recent.iter().sum::<f64>() / recent.len() as f64;
    let stddev = sample_stddev(recent);
    let z = (current_sentiment - mean) / stddev.max(0.01);

    z.clamp(-3.0, 3.0)
}

/// Average of four adequacy factors, each clamped to [0, 1]:
/// sample size (`|G|/100`), mean engagement (`/5`), composite magnitude
/// (`/2`), and author diversity (unique authors / `|G|`).
///
/// Uses the already-combined composite score, so it must be computed after
/// the composite.
pub fn confidence_score(posts: &[Post], composite: f64) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }

    let count = posts.len() as f64;

    let sample_factor = (count / 100.0).clamp(0.0, 1.0);

    let mean_engagement = posts
        .iter()
        .map(|post| post.feature(feature_keys::ENGAGEMENT_SCORE))
        .sum::<f64>()
        / count;
    let engagement_factor = (mean_engagement / 5.0).clamp(0.0, 1.0);

    let magnitude_factor = (composite.abs() / 2.0).clamp(0.0, 1.0);

    let unique_authors = posts
        .iter()
        .map(|post| post.author.as_str())
        .collect::<HashSet<_>>()
        .len() as f64;
    let diversity_factor = (unique_authors / count).clamp(0.0, 1.0);

    (sample_factor + engagement_factor + magnitude_factor + diversity_factor) / 4.0
}

/// Sample (n-1) standard deviation. Fewer than 2 values yield 0.
fn sample_stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
