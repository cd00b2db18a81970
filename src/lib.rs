// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod filter;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::config::{AppConfig, Source};
pub use crate::ingest::types::{Entry, FeedFetcher};
pub use crate::notify::{DeliveryOutcome, Notifier, SlackNotifier};
pub use crate::pipeline::{run_once, RunReport, SourceOutcome};
pub use crate::summarize::{ChatSummarizer, Summarizer, SummaryOutcome};
