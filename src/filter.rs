// src/filter.rs
//! Eligibility gate: recency window + keyword match.
//!
//! An entry passes when its publish timestamp parses, falls inside the
//! lookback window, and its title+summary text contains at least one
//! configured keyword as a literal substring.

use time::format_description::well_known::{Iso8601, Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::ingest::types::Entry;

/// Permissive publish-date parser. Timestamps without an offset are assumed
/// UTC. Returns `None` on anything unparseable.
pub fn parse_published(raw: &str) -> Option<OffsetDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc2822) {
        return Some(dt);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Iso8601::DEFAULT) {
        return Some(dt);
    }

    // Naive fallbacks seen in the wild.
    let naive_t = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, naive_t) {
        return Some(dt.assume_utc());
    }
    let naive_space = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(dt) = PrimitiveDateTime::parse(s, naive_space) {
        return Some(dt.assume_utc());
    }

    None
}

/// Strict `<` against the window start: an entry published exactly at
/// `window_start` is still eligible.
pub fn is_eligible(entry: &Entry, window_start: OffsetDateTime, keywords: &[String]) -> bool {
    let Some(published) = entry.published.as_deref().and_then(parse_published) else {
        return false;
    };
    if published < window_start {
        return false;
    }

    let haystack = format!("{} {}", entry.title, entry.summary).to_lowercase();
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}
