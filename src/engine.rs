// =============================================================================
// Signal Engine -- per-batch orchestration
// =============================================================================
//
// Turns one batch of featurized posts into market signals:
//   1. Route posts to tracked symbols
//   2. Gate: fewer than `min_posts_per_symbol` matched posts => no signal
//   3. Score factors against the symbol's pre-update history snapshot
//   4. Combine into the composite, classify, compute confidence
//   5. Emit the signal, then append the composite to the history window
//
// A symbol's own new score must never feed its own momentum in the same
// batch, so the history append is the last step for each symbol. Symbols
// are mutually independent: a rejected group leaves every other symbol's
// signal and history untouched.
// =============================================================================

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::runtime_config::RuntimeConfig;
use crate::signals::factors::{confidence_score, momentum_score, sentiment_score, volume_score};
use crate::signals::{route_posts, ScoreHistory, SignalClassifier};
use crate::types::{MarketSignal, Post};

// =============================================================================
// Batch report
// =============================================================================

/// A symbol group rejected for violating the caller contract.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolRejection {
    pub symbol: String,
    pub reason: String,
}

/// Outcome of processing one batch: the signals produced plus any
/// per-symbol contract rejections.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub signals: Vec<MarketSignal>,
    pub rejections: Vec<SymbolRejection>,
}

// =============================================================================
// Signal Engine
// =============================================================================

pub struct SignalEngine {
    symbols: Vec<String>,
    min_posts_per_symbol: usize,
    classifier: SignalClassifier,
    history: ScoreHistory,
}

impl SignalEngine {
    /// Build an engine from the runtime configuration, validating the
    /// classifier weights up front.
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let classifier = SignalClassifier::new(
            config.classifier.weights,
            config.classifier.bullish_threshold,
            config.classifier.bearish_threshold,
        )?;

        Ok(Self {
            symbols: config.symbols.clone(),
            min_posts_per_symbol: config.min_posts_per_symbol,
            classifier,
            history: ScoreHistory::new(config.history_window),
        })
    }

    /// Read access to the per-symbol score windows.
    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    /// Process one batch of posts at the evaluation instant `now`.
    ///
    /// `now` is passed in explicitly: the volume factor measures "the last
    /// hour" relative to it, and every emitted signal is stamped with it.
    ///
    /// Takes `&mut self` so that no symbol's window can change between the
    /// factor reads and the append for that symbol.
    pub fn process_batch(&mut self, posts: &[Post], now: DateTime<Utc>) -> BatchReport {
        let groups = route_posts(posts, &self.symbols);
        debug!(
            batch_size = posts.len(),
            matched_symbols = groups.len(),
            "batch routed"
        );

        let mut report = BatchReport::default();

        for (symbol, group) in groups {
            // Minimum-evidence gate: thin groups are skipped, not errors.
            if group.len() < self.min_posts_per_symbol {
                debug!(
                    symbol = %symbol,
                    matched = group.len(),
                    required = self.min_posts_per_symbol,
                    "insufficient posts, skipping symbol"
                );
                continue;
            }

            if let Some(reason) = validate_group(&group) {
                warn!(symbol = %symbol, reason = %reason, "rejecting symbol group");
                report.rejections.push(SymbolRejection { symbol, reason });
                continue;
            }

            // All factor reads use the snapshot taken before this batch's
            // append for the symbol.
            let history = self.history.snapshot(&symbol);

            let sentiment = sentiment_score(&group);
            let volume = volume_score(&group, now);
            let momentum = momentum_score(&history, sentiment);
            let composite = self.classifier.composite(sentiment, volume, momentum);
            let confidence = confidence_score(&group, composite);
            let label = self.classifier.classify(composite);

            info!(
                symbol = %symbol,
                sentiment,
                volume,
                momentum,
                composite,
                confidence,
                label = %label,
                "signal generated"
            );

            report.signals.push(MarketSignal {
                timestamp: now,
                symbol: symbol.clone(),
                sentiment_score: sentiment,
                volume_score: volume,
                momentum_score: momentum,
                composite_score: composite,
                confidence,
                label,
            });

            // Finalized: only now does the score enter the window.
            self.history.append(&symbol, composite);
        }

        report
    }
}

/// Check a symbol group against the caller contract. Returns a descriptive
/// reason when any post is malformed.
fn validate_group(group: &[Post]) -> Option<String> {
    for post in group {
        if post.id.trim().is_empty() {
            return Some(format!(
                "malformed post: empty identifier (author '{}')",
                post.author
            ));
        }
        if post.author.trim().is_empty() {
            return Some(format!("malformed post: empty author (id '{}')", post.id));
        }
    }
    None
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::factors;
    use crate::types::feature_keys;
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    fn eval_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap()
    }

    fn engine() -> SignalEngine {
        SignalEngine::new(&RuntimeConfig::default()).unwrap()
    }

    fn post(
        symbol_text: &str,
        author: &str,
        timestamp: DateTime<Utc>,
        bullish: f64,
        bearish: f64,
        engagement: f64,
    ) -> Post {
        let mut features = HashMap::new();
        features.insert(feature_keys::BULLISH_KEYWORDS.to_string(), bullish);
        features.insert(feature_keys::BEARISH_KEYWORDS.to_string(), bearish);
        features.insert(feature_keys::ENGAGEMENT_SCORE.to_string(), engagement);

        Post {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            timestamp,
            text: format!("{symbol_text} looking interesting today"),
            likes: 100,
            reposts: 50,
            replies: 10,
            tags: Vec::new(),
            mentions: Vec::new(),
            language: None,
            features,
        }
    }

    fn bullish_batch(count: usize, now: DateTime<Utc>) -> Vec<Post> {
        (0..count)
            .map(|i| {
                post(
                    "NIFTY",
                    &format!("user{i}"),
                    now - Duration::minutes(i as i64),
                    3.0,
                    0.0,
                    2.5,
                )
            })
            .collect()
    }

    #[test]
    fn bullish_posts_produce_bullish_signal() {
        let now = eval_instant();
        let report = engine().process_batch(&bullish_batch(20, now), now);

        let signal = report
            .signals
            .iter()
            .find(|s| s.symbol == "NIFTY")
            .expect("NIFTY signal missing");
        assert!(signal.sentiment_score > 0.0);
        assert_eq!(signal.label, crate::types::SignalLabel::Bullish);
        assert_eq!(signal.timestamp, now);
    }

    #[test]
    fn bearish_posts_produce_bearish_signal() {
        let now = eval_instant();
        let posts: Vec<Post> = (0..20)
            .map(|i| {
                post(
                    "NIFTY",
                    &format!("user{i}"),
                    now - Duration::minutes(i as i64),
                    0.0,
                    3.0,
                    2.5,
                )
            })
            .collect();

        let report = engine().process_batch(&posts, now);
        let signal = report
            .signals
            .iter()
            .find(|s| s.symbol == "NIFTY")
            .expect("NIFTY signal missing");
        assert!(signal.sentiment_score < 0.0);
        assert_eq!(signal.label, crate::types::SignalLabel::Bearish);
    }

    #[test]
    fn mixed_sentiment_stays_neutral() {
        let now = eval_instant();
        let posts: Vec<Post> = (0..10)
            .map(|i| {
                let (bullish, bearish) = if i % 2 == 0 { (1.0, 0.0) } else { (0.0, 1.0) };
                post(
                    "SENSEX",
                    &format!("user{i}"),
                    now - Duration::minutes(i as i64),
                    bullish,
                    bearish,
                    1.0,
                )
            })
            .collect();

        let report = engine().process_batch(&posts, now);
        let signal = report
            .signals
            .iter()
            .find(|s| s.symbol == "SENSEX")
            .expect("SENSEX signal missing");
        assert!(signal.sentiment_score.abs() < 1e-9);
        assert_eq!(signal.label, crate::types::SignalLabel::Neutral);
    }

    #[test]
    fn nine_posts_emit_no_signal() {
        let now = eval_instant();
        let report = engine().process_batch(&bullish_batch(9, now), now);
        assert!(report.signals.is_empty());
        assert!(report.rejections.is_empty());
    }

    #[test]
    fn thin_symbols_never_reach_output() {
        // Random-ish mixture: only symbols with >= 10 matched posts may
        // appear in the output, whatever their content.
        let now = eval_instant();
        let mut posts = bullish_batch(12, now);
        for i in 0..7 {
            posts.push(post(
                "SENSEX",
                &format!("s{i}"),
                now - Duration::minutes(i as i64),
                0.0,
                3.0,
                4.0,
            ));
        }

        let report = engine().process_batch(&posts, now);
        assert!(report.signals.iter().all(|s| s.symbol != "SENSEX"));
        assert!(report.signals.iter().any(|s| s.symbol == "NIFTY"));
    }

    #[test]
    fn momentum_uses_pre_update_history() {
        let now = eval_instant();
        let mut engine = engine();

        // Two priming batches with different sentiment polarity so the
        // window holds two distinct composites.
        engine.process_batch(&bullish_batch(20, now), now);
        let bearish: Vec<Post> = (0..20)
            .map(|i| {
                post(
                    "NIFTY",
                    &format!("user{i}"),
                    now - Duration::minutes(i as i64),
                    0.0,
                    3.0,
                    2.5,
                )
            })
            .collect();
        engine.process_batch(&bearish, now);

        let history_before = engine.history().snapshot("NIFTY");
        assert_eq!(history_before.len(), 2);

        let batch = bullish_batch(20, now);
        let expected_sentiment = factors::sentiment_score(&route_posts(
            &batch,
            &["NIFTY".to_string()],
        )["NIFTY"]);
        let expected_momentum = factors::momentum_score(&history_before, expected_sentiment);

        let report = engine.process_batch(&batch, now);
        let signal = report
            .signals
            .iter()
            .find(|s| s.symbol == "NIFTY")
            .expect("NIFTY signal missing");

        assert!((signal.momentum_score - expected_momentum).abs() < 1e-12);
        // The new composite only lands in the window after the fact.
        assert_eq!(engine.history().len("NIFTY"), 3);
    }

    #[test]
    fn momentum_zero_until_two_prior_scores() {
        let now = eval_instant();
        let mut engine = engine();

        let first = engine.process_batch(&bullish_batch(20, now), now);
        assert_eq!(first.signals[0].momentum_score, 0.0);

        let second = engine.process_batch(&bullish_batch(20, now), now);
        assert_eq!(second.signals[0].momentum_score, 0.0);

        // Third batch sees two prior entries and may move.
        let third = engine.process_batch(&bullish_batch(20, now), now);
        assert_eq!(third.signals.len(), 1);
    }

    #[test]
    fn factor_bounds_hold_across_batches() {
        let now = eval_instant();
        let mut engine = engine();

        for round in 0..20 {
            let posts: Vec<Post> = (0..15)
                .map(|i| {
                    post(
                        "NIFTY",
                        &format!("user{}", i % 4),
                        now - Duration::minutes((round * 15 + i) as i64),
                        (round % 5) as f64,
                        (i % 3) as f64,
                        (i % 7) as f64,
                    )
                })
                .collect();

            let report = engine.process_batch(&posts, now);
            for signal in &report.signals {
                assert!((-3.0..=3.0).contains(&signal.momentum_score));
                assert!((0.0..=1.0).contains(&signal.confidence));
            }
        }
    }

    #[test]
    fn malformed_post_rejects_only_its_symbol() {
        let now = eval_instant();
        let mut engine = engine();

        let mut nifty = bullish_batch(12, now);
        nifty[3].id = "  ".into(); // malformed: blank identifier

        let sensex: Vec<Post> = (0..12)
            .map(|i| {
                post(
                    "SENSEX",
                    &format!("s{i}"),
                    now - Duration::minutes(i as i64),
                    2.0,
                    0.0,
                    1.5,
                )
            })
            .collect();

        let mut posts = nifty;
        posts.extend(sensex);

        let report = engine.process_batch(&posts, now);

        assert_eq!(report.rejections.len(), 1);
        assert_eq!(report.rejections[0].symbol, "NIFTY");
        assert!(report.rejections[0].reason.contains("empty identifier"));

        // The independent symbol still signals, and the rejected symbol's
        // history stays untouched.
        assert!(report.signals.iter().any(|s| s.symbol == "SENSEX"));
        assert_eq!(engine.history().len("NIFTY"), 0);
        assert_eq!(engine.history().len("SENSEX"), 1);
    }

    #[test]
    fn long_run_respects_history_window() {
        let now = eval_instant();
        let mut engine = engine();
        let mut composites = Vec::new();

        for round in 0..150 {
            // Vary engagement so each batch lands a different composite.
            let posts: Vec<Post> = (0..12)
                .map(|i| {
                    post(
                        "NIFTY",
                        &format!("user{i}"),
                        now - Duration::minutes(i as i64),
                        2.0,
                        0.0,
                        (round % 9) as f64,
                    )
                })
                .collect();

            let report = engine.process_batch(&posts, now);
            composites.push(report.signals[0].composite_score);
        }

        let window = engine.history().snapshot("NIFTY");
        assert_eq!(window.len(), 100);
        assert_eq!(window.as_slice(), &composites[50..]);
    }
}
