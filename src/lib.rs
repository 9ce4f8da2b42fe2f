//! Newsletter Digest: day-bucketed newsletter enrichment
//!
//! This crate classifies a batch of raw mail messages, keeps the ones that look
//! like newsletters, attaches a generated summary and titled outbound links to
//! each, and groups the results by calendar day.

pub mod classify;
pub mod config;
pub mod links;
pub mod message;
pub mod output;
pub mod pipeline;
pub mod summarize;

use thiserror::Error;

/// Main error type for Newsletter Digest operations
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Message source error: {0}")]
    Source(#[from] SourceError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised while probing or fetching a linked page
///
/// These never leave the link resolver; they only select a fallback path.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Classifies a reqwest error for the given URL
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_redirect() {
            FetchError::RedirectLimit {
                url: url.to_string(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Errors raised by a summarization backend
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Summarization request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Summarization service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Malformed summarization response: {0}")]
    Malformed(String),

    #[error("Missing API key (environment variable {0} is not set)")]
    MissingApiKey(String),
}

/// Errors raised by a raw-message source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read messages: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode messages: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Message not found: {0}")]
    NotFound(String),

    #[error("Message source unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate message id in batch: {0}")]
    DuplicateId(String),
}

/// Result type alias for Newsletter Digest operations
pub type Result<T> = std::result::Result<T, DigestError>;

/// Result type alias for link fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use classify::{MessageClassification, NewsletterClassifier};
pub use config::Config;
pub use message::{EnrichedMessage, Link, RawMessage};
pub use pipeline::{DayAggregator, DayBuckets, MessageEnricher, MessageSource, Pipeline};
