// src/notify/slack.rs
use anyhow::{Context, Result};
use reqwest::Client;

use super::{DeliveryOutcome, Notifier};

/// Posts `{"text": ...}` to a Slack incoming webhook. Fire-and-forget: one
/// request, no retry, no read receipt.
pub struct SlackNotifier {
    webhook_url: Option<String>,
    client: Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: Client::new(),
        }
    }

    async fn post(&self, url: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({ "text": text });
        self.client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("slack post")?
            .error_for_status()
            .context("slack non-2xx")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, text: &str) -> DeliveryOutcome {
        let Some(url) = &self.webhook_url else {
            tracing::info!("slack disabled (no SLACK_WEBHOOK_URL), dropping message");
            return DeliveryOutcome::Skipped;
        };

        match self.post(url, text).await {
            Ok(()) => DeliveryOutcome::Sent,
            Err(e) => {
                tracing::warn!(error = ?e, "slack delivery failed");
                DeliveryOutcome::Failed
            }
        }
    }
}
