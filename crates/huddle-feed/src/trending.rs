//! Trending-tag ranking
//!
//! Scans every post for `#word` occurrences in the body text and for skill
//! labels, case-normalized to lowercase, and ranks tags by total count.
//! Every occurrence counts: a post repeating a hashtag twice contributes 2
//! to that tag.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::post::Post;

/// Maximum number of tags returned by a trending query.
pub const TRENDING_LIMIT: usize = 10;

static HASHTAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\w+").unwrap_or_else(|e| panic!("hashtag pattern: {e}")));

/// A tag with its aggregate occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    /// Lowercased tag, without the leading `#`
    pub tag: String,
    /// Total occurrences across all posts
    pub count: usize,
}

/// Rank tags across `posts`, descending by count, capped at
/// [`TRENDING_LIMIT`]. Equal counts order by ascending tag name, which
/// keeps the ranking stable across hydration cycles.
pub fn trending_tags(posts: &[Post]) -> Vec<TagCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for post in posts {
        for m in HASHTAG.find_iter(&post.content) {
            let tag = m.as_str()[1..].to_lowercase();
            *counts.entry(tag).or_insert(0) += 1;
        }
        for skill in &post.skills {
            *counts.entry(skill.to_lowercase()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(TRENDING_LIMIT);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::{Role, UserId};

    fn post(content: &str, skills: &[&str]) -> Post {
        let mut p = Post::new(UserId::new(), "Alice", Role::Athlete, content);
        p.skills = skills.iter().map(|s| s.to_string()).collect();
        p
    }

    #[test]
    fn test_repeated_hashtag_counts_each_occurrence() {
        let posts = vec![post("Great game #win #win", &[])];
        let ranked = trending_tags(&posts);
        assert_eq!(
            ranked,
            vec![TagCount {
                tag: "win".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_skills_count_alongside_hashtags_lowercased() {
        let posts = vec![
            post("drills paid off #Sprint", &["Sprint"]),
            post("new PR today", &["sprint"]),
        ];
        let ranked = trending_tags(&posts);
        assert_eq!(ranked[0].tag, "sprint");
        assert_eq!(ranked[0].count, 3);
    }

    #[test]
    fn test_ties_break_by_tag_name() {
        let posts = vec![post("#bravo #alpha", &[])];
        let ranked = trending_tags(&posts);
        assert_eq!(ranked[0].tag, "alpha");
        assert_eq!(ranked[1].tag, "bravo");
    }

    #[test]
    fn test_caps_at_trending_limit() {
        let content = (0..15).map(|i| format!("#tag{i:02}")).collect::<Vec<_>>();
        let posts = vec![post(&content.join(" "), &[])];
        assert_eq!(trending_tags(&posts).len(), TRENDING_LIMIT);
    }

    #[test]
    fn test_empty_feed_has_no_trending_tags() {
        assert!(trending_tags(&[]).is_empty());
    }
}
