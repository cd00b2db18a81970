// src/pipeline.rs
//! One pipeline pass: fetch each source in declared order, filter its most
//! recent entries, summarize and notify on match, stop the whole run at the
//! delivery cap.

use time::{Duration, OffsetDateTime};

use crate::config::AppConfig;
use crate::filter::is_eligible;
use crate::ingest::types::FeedFetcher;
use crate::notify::{DeliveryOutcome, Notifier};
use crate::summarize::Summarizer;

/// How one source ended the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Processed { scanned: usize, matched: usize },
    /// Fetch or parse failed; the source contributed zero entries.
    FetchFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub window_start: OffsetDateTime,
    pub scanned: usize,
    pub matched: usize,
    /// Notification attempts, monotonically non-decreasing, never above the
    /// configured cap. Skipped/failed deliveries still count.
    pub delivered: usize,
    pub sources: Vec<(String, SourceOutcome)>,
}

pub async fn run_once(
    cfg: &AppConfig,
    fetcher: &dyn FeedFetcher,
    summarizer: &dyn Summarizer,
    notifier: &dyn Notifier,
) -> RunReport {
    let window_start = OffsetDateTime::now_utc() - Duration::hours(cfg.lookback_hours);
    let mut report = RunReport {
        window_start,
        scanned: 0,
        matched: 0,
        delivered: 0,
        sources: Vec::with_capacity(cfg.sources.len()),
    };

    tracing::info!(window_start = %window_start, sources = cfg.sources.len(), "starting feed pass");

    for source in &cfg.sources {
        tracing::info!(source = %source.name, "checking source");

        let entries = match fetcher.fetch(&source.url).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(source = %source.name, error = ?e, "source fetch failed");
                report
                    .sources
                    .push((source.name.clone(), SourceOutcome::FetchFailed(format!("{e:#}"))));
                continue;
            }
        };

        let mut scanned = 0usize;
        let mut matched = 0usize;
        for entry in entries.iter().take(cfg.per_source_cap) {
            scanned += 1;
            if !is_eligible(entry, window_start, &cfg.keywords) {
                continue;
            }
            matched += 1;
            tracing::info!(source = %source.name, title = %entry.title, "matched entry");

            let summary = summarizer.summarize(&entry.title, &entry.summary).await;
            let message =
                format_message(&source.name, &entry.title, &entry.link, &summary.into_text());

            match notifier.notify(&message).await {
                DeliveryOutcome::Sent => {
                    tracing::info!(source = %source.name, "notification sent");
                }
                DeliveryOutcome::Skipped => {
                    tracing::info!(source = %source.name, "notification skipped");
                }
                DeliveryOutcome::Failed => {
                    tracing::warn!(source = %source.name, "notification delivery failed");
                }
            }
            report.delivered += 1;

            if report.delivered >= cfg.max_deliveries {
                report.scanned += scanned;
                report.matched += matched;
                report
                    .sources
                    .push((source.name.clone(), SourceOutcome::Processed { scanned, matched }));
                tracing::info!(delivered = report.delivered, "delivery cap reached, stopping run");
                return report;
            }
        }

        report.scanned += scanned;
        report.matched += matched;
        report
            .sources
            .push((source.name.clone(), SourceOutcome::Processed { scanned, matched }));
    }

    tracing::info!(
        scanned = report.scanned,
        matched = report.matched,
        delivered = report.delivered,
        "feed pass finished"
    );
    report
}

/// Slack mrkdwn message body.
pub fn format_message(source: &str, title: &str, link: &str, summary: &str) -> String {
    format!(
        "📢 *[{source}] Tech Update*\n👉 <{link}|*{title}*>\n━━━━━━━━━━━━━━━━━━\n{summary}\n"
    )
}
