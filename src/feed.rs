// =============================================================================
// Post Feed -- acquisition contract and synthetic generator
// =============================================================================
//
// The engine consumes posts through the `PostSource` contract and never
// cares where they come from. A source may return fewer posts than
// requested; backfilling is the caller's concern, which is exactly what
// `SyntheticFeed` exists for.
// =============================================================================

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::types::Post;

/// Anything that can supply a batch of posts for a set of tags.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch up to `target_count` posts relevant to `tags`, giving up after
    /// `deadline`. Implementations may return fewer posts than requested.
    async fn fetch_posts(
        &self,
        tags: &[String],
        target_count: usize,
        deadline: Duration,
    ) -> Result<Vec<Post>>;
}

// =============================================================================
// SyntheticFeed
// =============================================================================

/// Post templates; `{price}` is substituted per post.
const TEMPLATES: &[&str] = &[
    "#NIFTY50 looking bullish today! Target {price}",
    "Bearish on #SENSEX, support at {price}",
    "#BANKNIFTY intraday setup: Buy above {price}",
    "Market update: #NIFTY50 at {price}, momentum positive",
    "#Intraday tip: Sell #SENSEX below {price}",
];

const TAG_POOL: &[&str] = &["NIFTY50", "SENSEX", "BANKNIFTY"];

/// Templated random-post generator. Timestamps are spread over the last 24
/// hours so the volume factor sees both recent and older posts.
#[derive(Debug, Default)]
pub struct SyntheticFeed;

impl SyntheticFeed {
    pub fn new() -> Self {
        Self
    }

    /// Generate `count` synthetic posts.
    pub fn generate(&self, count: usize) -> Vec<Post> {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        (0..count)
            .map(|_| {
                let template = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
                let price = rng.gen_range(15_000..20_000);
                let text = template.replace("{price}", &price.to_string());

                let tags: Vec<String> = TAG_POOL
                    .iter()
                    .filter(|_| rng.gen_bool(0.5))
                    .map(|t| t.to_string())
                    .collect();

                Post {
                    id: Uuid::new_v4().to_string(),
                    author: format!("trader_{}", rng.gen_range(0..1000)),
                    timestamp: now - chrono::Duration::minutes(rng.gen_range(0..1440)),
                    text,
                    likes: rng.gen_range(0..100),
                    reposts: rng.gen_range(0..50),
                    replies: rng.gen_range(0..20),
                    tags,
                    mentions: Vec::new(),
                    language: Some("en".to_string()),
                    features: Default::default(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl PostSource for SyntheticFeed {
    /// Tags and deadline are accepted for contract compatibility; synthesis
    /// is instant and always hits the target count.
    async fn fetch_posts(
        &self,
        tags: &[String],
        target_count: usize,
        _deadline: Duration,
    ) -> Result<Vec<Post>> {
        info!(count = target_count, tags = ?tags, "generating synthetic posts");
        Ok(self.generate(target_count))
    }
}
