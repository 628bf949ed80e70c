// =============================================================================
// Symbol Router -- assign posts to the tracked symbols they reference
// =============================================================================

use std::collections::HashMap;

use crate::types::Post;

/// Group a batch of posts by tracked symbol.
///
/// A post matches a symbol when its text or any of its tags contains the
/// symbol name, case-insensitively. One post may match several symbols and
/// is placed independently in each matching group. Posts matching nothing
/// are dropped.
///
/// Pure function of its inputs; routing the same batch twice yields the
/// same groups.
pub fn route_posts(posts: &[Post], symbols: &[String]) -> HashMap<String, Vec<Post>> {
    let mut groups: HashMap<String, Vec<Post>> = HashMap::new();

    for symbol in symbols {
        let needle = symbol.to_lowercase();
        for post in posts {
            let in_text = post.text.to_lowercase().contains(&needle);
            let in_tags = post
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle));

            if in_text || in_tags {
                groups.entry(symbol.clone()).or_default().push(post.clone());
            }
        }
    }

    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
