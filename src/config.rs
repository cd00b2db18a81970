// src/config.rs
//! Startup configuration: pipeline data from a TOML file, secrets from the
//! environment. Built once in `main` and passed by reference into the
//! components; nothing here is global or mutable after load.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/notifier.toml";

pub const ENV_CONFIG_PATH: &str = "NOTIFIER_CONFIG_PATH";
pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// One feed source, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
}

/// On-disk shape of the TOML file. Tunables default so a minimal file only
/// needs sources and keywords.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    sources: Vec<Source>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default = "default_lookback_hours")]
    lookback_hours: i64,
    #[serde(default = "default_max_deliveries")]
    max_deliveries: usize,
    #[serde(default = "default_per_source_cap")]
    per_source_cap: usize,
    #[serde(default = "default_model")]
    model: String,
    prompt_template: Option<String>,
}

fn default_lookback_hours() -> i64 {
    25
}
fn default_max_deliveries() -> usize {
    3
}
fn default_per_source_cap() -> usize {
    10
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a research engineer following computer architecture, hardware and AI systems.\n\
Brief a colleague on the news item below: focus on performance impact, architectural\n\
changes and technical specifics, in at most three sentences.\n\
\n\
Title: {title}\n\
Content: {content}";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sources: Vec<Source>,
    /// Lowercased, deduplicated, never empty.
    pub keywords: Vec<String>,
    pub lookback_hours: i64,
    pub max_deliveries: usize,
    pub per_source_cap: usize,
    pub model: String,
    pub prompt_template: String,
    pub webhook_url: Option<String>,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load from `$NOTIFIER_CONFIG_PATH` or `config/notifier.toml`, then pick
    /// up secrets from the environment.
    pub fn load_default() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config from {}", path.display()))?;
        Self::from_raw(raw, env_opt(ENV_WEBHOOK_URL), env_opt(ENV_API_KEY))
    }

    fn from_raw(
        raw: RawConfig,
        webhook_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self> {
        if raw.sources.is_empty() {
            bail!("config declares no sources");
        }
        for s in &raw.sources {
            if s.name.trim().is_empty() {
                bail!("source with url {} has an empty name", s.url);
            }
            if !(s.url.starts_with("http://") || s.url.starts_with("https://")) {
                bail!("source {} has a non-http(s) url: {}", s.name, s.url);
            }
        }

        let keywords = clean_keywords(&raw.keywords);
        if keywords.is_empty() {
            bail!("config declares no keywords");
        }
        if raw.lookback_hours <= 0 {
            bail!("lookback_hours must be positive");
        }
        if raw.max_deliveries == 0 {
            bail!("max_deliveries must be at least 1");
        }
        if raw.per_source_cap == 0 {
            bail!("per_source_cap must be at least 1");
        }

        Ok(Self {
            sources: raw.sources,
            keywords,
            lookback_hours: raw.lookback_hours,
            max_deliveries: raw.max_deliveries,
            per_source_cap: raw.per_source_cap,
            model: raw.model,
            prompt_template: raw
                .prompt_template
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),
            webhook_url,
            api_key,
        })
    }
}

/// Lowercase, trim, drop empties, dedup. Matching is substring-based, so the
/// stored form is exactly what the filter compares against.
fn clean_keywords(items: &[String]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
