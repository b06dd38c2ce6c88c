//! Post model

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// URL segment under which posts are published
pub const POST_DIR: &str = "post";

/// An immutable metadata snapshot of one blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Unique, URL-friendly identifier
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short description shown on cards and in the feed
    #[serde(default)]
    pub summary: Option<String>,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    /// Content language tag ("en", "zh-CN", ...)
    pub lang: String,

    /// Work in progress, never published
    #[serde(default)]
    pub draft: bool,

    /// Published but kept out of listings and the feed
    #[serde(default)]
    pub hidden: bool,

    /// Raw markdown body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl PostRecord {
    /// Create a visible post with minimal required fields
    pub fn new(slug: &str, title: &str, date: DateTime<FixedOffset>, lang: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            summary: None,
            date,
            lang: lang.to_string(),
            draft: false,
            hidden: false,
            body: String::new(),
        }
    }

    /// Neither a draft nor hidden
    pub fn is_visible(&self) -> bool {
        !self.draft && !self.hidden
    }

    /// Site-relative path of the post page
    pub fn path(&self) -> String {
        format!("/{}/{}", POST_DIR, self.slug)
    }

    /// Absolute URL of the post page
    pub fn permalink(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    /// Get the previous (newer) post in a list
    pub fn prev<'a>(&self, posts: &[&'a PostRecord]) -> Option<&'a PostRecord> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a list
    pub fn next<'a>(&self, posts: &[&'a PostRecord]) -> Option<&'a PostRecord> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1).copied()
    }
}
