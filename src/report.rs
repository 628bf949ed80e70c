// =============================================================================
// Summary Report -- end-of-run console digest
// =============================================================================

use std::collections::HashSet;

use crate::engine::BatchReport;
use crate::types::Post;

/// Render the end-of-run summary: batch totals followed by the latest
/// signal per symbol.
pub fn render_summary(posts: &[Post], report: &BatchReport) -> String {
    let mut out = String::new();

    out.push_str("\n=== Market Pulse Summary ===\n");
    out.push_str(&format!("Total posts analyzed: {}\n", posts.len()));

    if let (Some(earliest), Some(latest)) = (
        posts.iter().map(|p| p.timestamp).min(),
        posts.iter().map(|p| p.timestamp).max(),
    ) {
        out.push_str(&format!("Time range: {earliest} to {latest}\n"));
    }

    let unique_authors: HashSet<&str> = posts.iter().map(|p| p.author.as_str()).collect();
    out.push_str(&format!("Unique authors: {}\n", unique_authors.len()));
    out.push_str(&format!(
        "\nTotal signals generated: {}\n",
        report.signals.len()
    ));

    for rejection in &report.rejections {
        out.push_str(&format!(
            "Rejected {}: {}\n",
            rejection.symbol, rejection.reason
        ));
    }

    // One block per symbol, keeping only its most recent signal.
    let mut symbols: Vec<&str> = report
        .signals
        .iter()
        .map(|s| s.symbol.as_str())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    symbols.sort_unstable();

    for symbol in symbols {
        let latest = report
            .signals
            .iter()
            .filter(|s| s.symbol == symbol)
            .max_by_key(|s| s.timestamp);

        if let Some(signal) = latest {
            out.push_str(&format!("\n{symbol}:\n"));
            out.push_str(&format!("  Latest signal: {}\n", signal.label));
            out.push_str(&format!(
                "  Composite score: {:.2}\n",
                signal.composite_score
            ));
            out.push_str(&format!(
                "  Confidence: {:.1}%\n",
                signal.confidence * 100.0
            ));
        }
    }

    out
}

/// Print the summary to stdout.
pub fn print_summary(posts: &[Post], report: &BatchReport) {
    print!("{}", render_summary(posts, report));
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MarketSignal, SignalLabel};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn sample_post(author: &str) -> Post {
        Post {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 4, 10, 0, 0).unwrap(),
            text: "NIFTY".into(),
            likes: 0,
            reposts: 0,
            replies: 0,
            tags: Vec::new(),
            mentions: Vec::new(),
            language: None,
            features: HashMap::new(),
        }
    }

    fn sample_signal(symbol: &str, composite: f64, label: SignalLabel) -> MarketSignal {
        MarketSignal {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 4, 12, 0, 0).unwrap(),
            symbol: symbol.into(),
            sentiment_score: 1.0,
            volume_score: 1.0,
            momentum_score: 0.0,
            composite_score: composite,
            confidence: 0.675,
            label,
        }
    }

    #[test]
    fn summary_lists_totals_and_symbols() {
        let posts = vec![sample_post("a"), sample_post("b"), sample_post("a")];
        let report = BatchReport {
            signals: vec![
                sample_signal("NIFTY", 2.08, SignalLabel::Bullish),
                sample_signal("SENSEX", 0.2, SignalLabel::Neutral),
            ],
            rejections: Vec::new(),
        };

        let text = render_summary(&posts, &report);
        assert!(text.contains("Total posts analyzed: 3"));
        assert!(text.contains("Unique authors: 2"));
        assert!(text.contains("Total signals generated: 2"));
        assert!(text.contains("NIFTY:"));
        assert!(text.contains("Latest signal: Bullish"));
        assert!(text.contains("Composite score: 2.08"));
        assert!(text.contains("Confidence: 67.5%"));
    }

    #[test]
    fn summary_mentions_rejections() {
        let report = BatchReport {
            signals: Vec::new(),
            rejections: vec![crate::engine::SymbolRejection {
                symbol: "NIFTY".into(),
                reason: "malformed post: empty identifier (author 'x')".into(),
            }],
        };

        let text = render_summary(&[], &report);
        assert!(text.contains("Rejected NIFTY"));
        assert!(text.contains("empty identifier"));
    }

    #[test]
    fn summary_handles_empty_run() {
        let text = render_summary(&[], &BatchReport::default());
        assert!(text.contains("Total posts analyzed: 0"));
        assert!(!text.contains("Time range"));
    }
}
