// =============================================================================
// Market Pulse — Main Entry Point
// =============================================================================
//
// One-shot pipeline: collect a batch of posts, featurize them, run the
// signal engine, and print the per-symbol summary. Storage and chart
// rendering are downstream consumers of the emitted signals and live
// outside this binary.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod engine;
mod features;
mod feed;
mod report;
mod runtime_config;
mod signals;
mod types;

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::engine::SignalEngine;
use crate::feed::{PostSource, SyntheticFeed};
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Market Pulse — Starting Up                       ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path = "market_pulse.json";
    let mut config = RuntimeConfig::load(config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        let defaults = RuntimeConfig::default();
        if let Err(e) = defaults.save(config_path) {
            warn!(error = %e, "Failed to write default config");
        }
        defaults
    });

    // Override symbols from env if available.
    if let Ok(syms) = std::env::var("PULSE_SYMBOLS") {
        config.symbols = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if config.symbols.is_empty() {
        config.symbols = vec!["NIFTY".into(), "SENSEX".into(), "BANKNIFTY".into()];
    }

    info!(symbols = ?config.symbols, "Tracked symbols");

    // ── 2. Collect posts ─────────────────────────────────────────────────
    info!("Starting data collection...");
    let source = SyntheticFeed::new();
    let deadline = Duration::from_secs(config.fetch_deadline_secs);
    let mut posts = source
        .fetch_posts(&config.tags, config.target_post_count, deadline)
        .await?;

    if posts.len() < config.target_post_count {
        warn!(
            collected = posts.len(),
            requested = config.target_post_count,
            "post source under-supplied"
        );
    }
    info!(count = posts.len(), "Collected posts");

    // ── 3. Featurize ─────────────────────────────────────────────────────
    info!("Processing posts...");
    features::process_posts(&mut posts);
    info!("Feature extraction completed");

    // ── 4. Generate signals ──────────────────────────────────────────────
    info!("Generating market signals...");
    let mut engine = SignalEngine::new(&config)?;
    let batch = engine.process_batch(&posts, Utc::now());

    for rejection in &batch.rejections {
        warn!(symbol = %rejection.symbol, reason = %rejection.reason, "symbol rejected");
    }
    info!(count = batch.signals.len(), "Signals generated");

    // ── 5. Summary report ────────────────────────────────────────────────
    report::print_summary(&posts, &batch);

    Ok(())
}
