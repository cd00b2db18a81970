// src/summarize.rs
//! Chat-completions summarizer. A degraded summary is an outcome, not an
//! error: the pipeline embeds placeholder text and keeps going.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_NO_CREDENTIAL: &str = "summary unavailable (no API credential)";
pub const PLACEHOLDER_FAILED: &str =
    "summary unavailable (summarization failed, see original link)";

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Outcome of one summarization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Generated(String),
    NoCredential,
    Failed,
}

impl SummaryOutcome {
    /// Text to embed in the notification; degraded variants map to fixed
    /// placeholders.
    pub fn into_text(self) -> String {
        match self {
            SummaryOutcome::Generated(s) => s,
            SummaryOutcome::NoCredential => PLACEHOLDER_NO_CREDENTIAL.to_string(),
            SummaryOutcome::Failed => PLACEHOLDER_FAILED.to_string(),
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, content: &str) -> SummaryOutcome;
}

/// OpenAI chat-completions client. Without an API key every call degrades to
/// `NoCredential` and no HTTP is attempted.
pub struct ChatSummarizer {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    prompt_template: String,
}

impl ChatSummarizer {
    pub fn new(api_key: Option<String>, model: String, prompt_template: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            prompt_template,
        }
    }

    /// `{title}` / `{content}` are substituted verbatim.
    fn render_prompt(&self, title: &str, content: &str) -> String {
        self.prompt_template
            .replace("{title}", title)
            .replace("{content}", content)
    }

    async fn call_model(&self, api_key: &str, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
            max_tokens: 300,
        };

        let resp = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .await
            .context("chat completions post")?
            .error_for_status()
            .context("chat completions non-2xx")?;

        let body: Resp = resp.json().await.context("chat completions body")?;
        Ok(body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default())
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, title: &str, content: &str) -> SummaryOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("summarizer disabled (no OPENAI_API_KEY)");
            return SummaryOutcome::NoCredential;
        };

        let prompt = self.render_prompt(title, content);
        match self.call_model(api_key, &prompt).await {
            Ok(text) if !text.is_empty() => SummaryOutcome::Generated(text),
            Ok(_) => {
                tracing::warn!(title, "model returned an empty summary");
                SummaryOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(error = ?e, title, "summarization call failed");
                SummaryOutcome::Failed
            }
        }
    }
}
