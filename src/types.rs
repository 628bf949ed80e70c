// =============================================================================
// Shared types used across the Market Pulse engine
// =============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known feature-map keys produced by the featurizer and read by the
/// signal engine. The engine treats every other key as opaque.
pub mod feature_keys {
    pub const BULLISH_KEYWORDS: &str = "bullish_keywords";
    pub const BEARISH_KEYWORDS: &str = "bearish_keywords";
    pub const ENGAGEMENT_SCORE: &str = "engagement_score";
}

/// A single social-media post with engagement counters, tags, and the
/// numeric feature map attached by the featurizer.
///
/// Posts are immutable once handed to the signal engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub reposts: u32,
    #[serde(default)]
    pub replies: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub features: HashMap<String, f64>,
}

impl Post {
    /// Feature lookup with a zero default. An absent key is never an error.
    pub fn feature(&self, key: &str) -> f64 {
        self.features.get(key).copied().unwrap_or(0.0)
    }
}

/// Directional classification of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

/// A fully computed market signal for one symbol.
///
/// Created by the signal engine once per qualifying symbol per batch and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSignal {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub sentiment_score: f64,
    pub volume_score: f64,
    /// Z-score momentum, clipped to [-3, 3].
    pub momentum_score: f64,
    pub composite_score: f64,
    /// Trustworthiness of the composite score, in [0, 1].
    pub confidence: f64,
    pub label: SignalLabel,
}
