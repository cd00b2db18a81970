// tests/pipeline_cap.rs
// Delivery-cap enforcement across sources: the cap is global, and the run
// short-circuits the moment it is reached.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use feed_brief_notifier::{
    run_once, AppConfig, DeliveryOutcome, Entry, FeedFetcher, Notifier, Source, SourceOutcome,
    Summarizer, SummaryOutcome,
};

struct ScriptedFetcher {
    feeds: HashMap<String, Vec<Entry>>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl FeedFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Entry>> {
        self.calls.lock().unwrap().push(url.to_string());
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no scripted feed for {url}"))
    }
}

struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    async fn summarize(&self, title: &str, _content: &str) -> SummaryOutcome {
        SummaryOutcome::Generated(format!("digest of {title}"))
    }
}

struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> DeliveryOutcome {
        self.sent.lock().unwrap().push(text.to_string());
        DeliveryOutcome::Sent
    }
}

fn recent_entry(title: &str, hours_ago: i64) -> Entry {
    let ts = OffsetDateTime::now_utc() - Duration::hours(hours_ago);
    Entry {
        title: title.to_string(),
        link: format!("https://example.test/{}", title.replace(' ', "-")),
        summary: "cache behaviour under load".to_string(),
        published: Some(ts.format(&Rfc3339).unwrap()),
    }
}

fn cfg(sources: Vec<Source>) -> AppConfig {
    AppConfig {
        sources,
        keywords: vec!["cache".to_string()],
        lookback_hours: 25,
        max_deliveries: 3,
        per_source_cap: 10,
        model: "gpt-4o-mini".to_string(),
        prompt_template: "Title: {title}\nContent: {content}".to_string(),
        webhook_url: None,
        api_key: None,
    }
}

#[tokio::test]
async fn cap_is_global_and_short_circuits_across_sources() {
    let source_a = Source {
        name: "A".to_string(),
        url: "https://a.test/rss".to_string(),
    };
    let source_b = Source {
        name: "B".to_string(),
        url: "https://b.test/rss".to_string(),
    };

    let feeds = HashMap::from([
        (
            source_a.url.clone(),
            vec![
                recent_entry("a one", 1),
                recent_entry("a two", 2),
                recent_entry("a three", 3),
                recent_entry("a four", 4),
            ],
        ),
        (
            source_b.url.clone(),
            vec![recent_entry("b one", 1), recent_entry("b two", 2)],
        ),
    ]);

    let fetcher = ScriptedFetcher {
        feeds,
        calls: Mutex::new(Vec::new()),
    };
    let notifier = RecordingNotifier {
        sent: Mutex::new(Vec::new()),
    };

    let report = run_once(&cfg(vec![source_a, source_b]), &fetcher, &EchoSummarizer, &notifier).await;

    assert_eq!(report.delivered, 3);

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|m| m.contains("*[A] Tech Update*")));

    // Source B was never touched: no fetch, no report row.
    let calls = fetcher.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], "https://a.test/rss");
    assert_eq!(report.sources.len(), 1);
    assert_eq!(
        report.sources[0],
        (
            "A".to_string(),
            SourceOutcome::Processed {
                scanned: 3,
                matched: 3
            }
        )
    );
}

#[tokio::test]
async fn per_source_lookback_count_bounds_scanning() {
    let source = Source {
        name: "A".to_string(),
        url: "https://a.test/rss".to_string(),
    };
    let entries: Vec<Entry> = (0..15).map(|i| recent_entry(&format!("item {i}"), 1)).collect();
    let feeds = HashMap::from([(source.url.clone(), entries)]);

    let fetcher = ScriptedFetcher {
        feeds,
        calls: Mutex::new(Vec::new()),
    };
    let notifier = RecordingNotifier {
        sent: Mutex::new(Vec::new()),
    };

    let mut config = cfg(vec![source]);
    config.max_deliveries = 50;

    let report = run_once(&config, &fetcher, &EchoSummarizer, &notifier).await;

    // Only the first 10 of 15 entries are ever considered.
    assert_eq!(report.scanned, 10);
    assert_eq!(report.matched, 10);
    assert_eq!(report.delivered, 10);
}

#[tokio::test]
async fn run_without_eligible_entries_delivers_nothing() {
    let source = Source {
        name: "A".to_string(),
        url: "https://a.test/rss".to_string(),
    };
    let feeds = HashMap::from([(
        source.url.clone(),
        vec![
            // outside the window
            recent_entry("stale cache story", 30),
            // inside the window, no keyword
            Entry {
                title: "Cooking recipe".to_string(),
                link: "https://example.test/recipe".to_string(),
                summary: "flour and salt".to_string(),
                published: Some(
                    (OffsetDateTime::now_utc() - Duration::hours(1))
                        .format(&Rfc3339)
                        .unwrap(),
                ),
            },
        ],
    )]);

    let fetcher = ScriptedFetcher {
        feeds,
        calls: Mutex::new(Vec::new()),
    };
    let notifier = RecordingNotifier {
        sent: Mutex::new(Vec::new()),
    };

    let report = run_once(&cfg(vec![source]), &fetcher, &EchoSummarizer, &notifier).await;

    assert_eq!(report.delivered, 0);
    assert_eq!(report.matched, 0);
    assert_eq!(report.scanned, 2);
    assert!(notifier.sent.lock().unwrap().is_empty());
}
