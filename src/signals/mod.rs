// =============================================================================
// Signals Module
// =============================================================================
//
// Signal-generation pipeline for the sentiment engine:
// - Symbol routing (post batch -> per-symbol groups)
// - Factor scoring (sentiment, volume, momentum, confidence)
// - Composite classification (weighted score -> directional label)
// - Bounded per-symbol score history (momentum baseline)

pub mod classifier;
pub mod factors;
pub mod history;
pub mod router;

pub use classifier::{ScoreWeights, SignalClassifier};
pub use history::ScoreHistory;
pub use router::route_posts;
