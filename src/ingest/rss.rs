// src/ingest/rss.rs
//! RSS 2.0 fetching and parsing. Absent fields are tolerated; the filter
//! decides what an entry without a usable timestamp is worth (nothing).

use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::normalize_text;
use crate::ingest::types::{Entry, FeedFetcher};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Parse an RSS document into entries, preserving feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<Entry>> {
    let xml_clean = scrub_entities(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        let summary = normalize_text(it.description.as_deref().unwrap_or_default());
        if title.is_empty() && summary.is_empty() {
            continue;
        }
        out.push(Entry {
            title,
            link: it.link.map(|l| l.trim().to_string()).unwrap_or_default(),
            summary,
            published: it.pub_date,
        });
    }
    Ok(out)
}

/// Fetches a feed over HTTP and parses it.
pub struct RssFetcher {
    client: reqwest::Client,
}

impl RssFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for RssFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for RssFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .context("feed http get")?
            .error_for_status()
            .context("feed non-2xx")?
            .text()
            .await
            .context("feed http .text()")?;
        parse_feed(&body)
    }
}

// Feeds routinely embed HTML entities the XML parser rejects.
fn scrub_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
