//! Feed Brief Notifier — Binary Entrypoint
//! One invocation performs a single fetch → filter → summarize → notify pass
//! and exits; scheduling cadence lives outside the process.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feed_brief_notifier::config::AppConfig;
use feed_brief_notifier::ingest::rss::RssFetcher;
use feed_brief_notifier::notify::SlackNotifier;
use feed_brief_notifier::pipeline;
use feed_brief_notifier::summarize::ChatSummarizer;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Invalid configuration is the only fatal error class; everything past
    // this point degrades instead of aborting.
    let cfg = AppConfig::load_default()?;

    tracing::info!(
        started_at = %chrono::Utc::now(),
        sources = cfg.sources.len(),
        keywords = cfg.keywords.len(),
        lookback_hours = cfg.lookback_hours,
        "feed brief notifier starting"
    );
    if cfg.webhook_url.is_none() {
        tracing::warn!("SLACK_WEBHOOK_URL not set, notifications will be dropped");
    }
    if cfg.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set, summaries degrade to placeholders");
    }

    let fetcher = RssFetcher::new();
    let summarizer = ChatSummarizer::new(
        cfg.api_key.clone(),
        cfg.model.clone(),
        cfg.prompt_template.clone(),
    );
    let notifier = SlackNotifier::new(cfg.webhook_url.clone());

    let report = pipeline::run_once(&cfg, &fetcher, &summarizer, &notifier).await;

    tracing::info!(
        scanned = report.scanned,
        matched = report.matched,
        delivered = report.delivered,
        "run complete"
    );
    Ok(())
}
