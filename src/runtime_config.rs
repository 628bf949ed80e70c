// =============================================================================
// Runtime Configuration -- engine settings with atomic save
// =============================================================================
//
// Central configuration for the Market Pulse pipeline. Persistence uses an
// atomic tmp + rename pattern to prevent corruption on crash. All fields
// carry `#[serde(default)]` so that adding new fields never breaks loading
// an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::signals::SignalClassifier;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec![
        "NIFTY".to_string(),
        "SENSEX".to_string(),
        "BANKNIFTY".to_string(),
    ]
}

fn default_tags() -> Vec<String> {
    vec![
        "nifty50".to_string(),
        "sensex".to_string(),
        "intraday".to_string(),
        "banknifty".to_string(),
    ]
}

fn default_target_post_count() -> usize {
    2000
}

fn default_history_window() -> usize {
    100
}

fn default_min_posts_per_symbol() -> usize {
    10
}

fn default_fetch_deadline_secs() -> u64 {
    600
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the pipeline.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Symbols & collection ------------------------------------------------

    /// Market symbols the engine tracks and routes posts to.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Tags handed to the post source when collecting a batch.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// How many posts to request per collection run.
    #[serde(default = "default_target_post_count")]
    pub target_post_count: usize,

    /// Collection deadline in seconds. The post source may return fewer
    /// posts than requested when the deadline hits.
    #[serde(default = "default_fetch_deadline_secs")]
    pub fetch_deadline_secs: u64,

    // --- Signal engine -------------------------------------------------------

    /// Maximum number of past composite scores retained per symbol.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Minimum matched posts required before a symbol produces a signal.
    #[serde(default = "default_min_posts_per_symbol")]
    pub min_posts_per_symbol: usize,

    /// Factor weights and classification thresholds.
    #[serde(default)]
    pub classifier: SignalClassifier,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            tags: default_tags(),
            target_post_count: default_target_post_count(),
            fetch_deadline_secs: default_fetch_deadline_secs(),
            history_window: default_history_window(),
            min_posts_per_symbol: default_min_posts_per_symbol(),
            classifier: SignalClassifier::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            window = config.history_window,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
