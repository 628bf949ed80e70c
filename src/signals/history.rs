// =============================================================================
// Score History -- bounded per-symbol window of past composite scores
// =============================================================================

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

/// Thread-safe store of the most recent composite scores per symbol,
/// oldest-first. Each window is capped at `window` entries; appending to a
/// full window evicts the oldest score (FIFO).
///
/// The store is owned by the signal engine. Within a batch, all reads of a
/// symbol's window happen before that symbol's append.
pub struct ScoreHistory {
    scores: RwLock<HashMap<String, VecDeque<f64>>>,
    window: usize,
}

impl ScoreHistory {
    /// Create a new history store retaining at most `window` scores per
    /// symbol.
    pub fn new(window: usize) -> Self {
        Self {
            scores: RwLock::new(HashMap::new()),
            window,
        }
    }

    /// Append a finalized composite score for `symbol`, evicting the oldest
    /// entry when the window is full.
    pub fn append(&self, symbol: &str, score: f64) {
        let mut map = self.scores.write();
        let ring = map
            .entry(symbol.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.window + 1));

        ring.push_back(score);
        while ring.len() > self.window {
            ring.pop_front();
        }
    }

    /// Return a copy of the current window for `symbol` (oldest-first).
    /// Unknown symbols yield an empty window.
    pub fn snapshot(&self, symbol: &str) -> Vec<f64> {
        let map = self.scores.read();
        map.get(symbol)
            .map(|ring| ring.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of scores currently retained for `symbol`.
    pub fn len(&self, symbol: &str) -> usize {
        let map = self.scores.read();
        map.get(symbol).map_or(0, VecDeque::len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
