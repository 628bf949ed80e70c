// =============================================================================
// Signal Classifier -- weighted composite score and directional label
// =============================================================================

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::types::SignalLabel;

fn default_sentiment_weight() -> f64 {
    0.5
}

fn default_volume_weight() -> f64 {
    0.2
}

fn default_momentum_weight() -> f64 {
    0.3
}

fn default_bullish_threshold() -> f64 {
    0.5
}

fn default_bearish_threshold() -> f64 {
    -0.5
}

/// Named weights for combining the three directional factors into the
/// composite score. The weights must be finite; they are not required to
/// sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_sentiment_weight")]
    pub sentiment: f64,
    #[serde(default = "default_volume_weight")]
    pub volume: f64,
    #[serde(default = "default_momentum_weight")]
    pub momentum: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            sentiment: default_sentiment_weight(),
            volume: default_volume_weight(),
            momentum: default_momentum_weight(),
        }
    }
}

impl ScoreWeights {
    /// Reject non-finite weights before they can poison every composite.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.sentiment.is_finite() && self.volume.is_finite() && self.momentum.is_finite(),
            "score weights must be finite: {self:?}"
        );
        Ok(())
    }
}

/// Maps factor scores to a composite score and a directional label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalClassifier {
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Composite scores strictly above this are Bullish.
    #[serde(default = "default_bullish_threshold")]
    pub bullish_threshold: f64,
    /// Composite scores strictly below this are Bearish.
    #[serde(default = "default_bearish_threshold")]
    pub bearish_threshold: f64,
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            bullish_threshold: default_bullish_threshold(),
            bearish_threshold: default_bearish_threshold(),
        }
    }
}

impl SignalClassifier {
    pub fn new(weights: ScoreWeights, bullish_threshold: f64, bearish_threshold: f64) -> Result<Self> {
        weights.validate()?;
        ensure!(
            bullish_threshold.is_finite() && bearish_threshold.is_finite(),
            "classification thresholds must be finite"
        );
        Ok(Self {
            weights,
            bullish_threshold,
            bearish_threshold,
        })
    }

    /// Weighted combination of the three directional factors.
    pub fn composite(&self, sentiment: f64, volume: f64, momentum: f64) -> f64 {
        sentiment * self.weights.sentiment
            + volume * self.weights.volume
            + momentum * self.weights.momentum
    }

    /// Classify a composite score into a directional label.
    pub fn classify(&self, composite: f64) -> SignalLabel {
        if composite > self.bullish_threshold {
            SignalLabel::Bullish
        } else if composite < self.bearish_threshold {
            SignalLabel::Bearish
        } else {
            SignalLabel::Neutral
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
