// src/ingest/types.rs
use anyhow::Result;

/// One syndicated item, in feed order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub title: String,
    /// Empty when the feed omits the link.
    pub link: String,
    /// Normalized description text; empty when the feed omits it.
    pub summary: String,
    /// Raw feed timestamp; parsed (permissively) by the filter.
    pub published: Option<String>,
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Entries as the source orders them (most-recent-first by convention).
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>>;
}
