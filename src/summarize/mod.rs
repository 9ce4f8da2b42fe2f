//! Message summarization
//!
//! The generative backend is a black box behind [`SummarizationService`].
//! [`Summarizer`] adds the fixed instruction, normalizes list markers, and
//! swallows backend failures into a placeholder.

mod openai;

pub use openai::OpenAiSummarizer;

use crate::SummarizeError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Summary text used when the backend cannot produce one
pub const SUMMARY_UNAVAILABLE: &str = "(Unable to summarize)";

/// Instruction sent with every body
pub const SUMMARY_INSTRUCTION: &str = "Summarize the following email content with variation, \
avoiding repetitive language such as \"The email discusses\" or \"The email provides.\" \
If the content contains multiple ideas or topics, break them into bullet points for clarity and engagement. \
Ensure the summary is concise and highlights key takeaways in an appealing way.";

static DASH_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^- ").expect("dash marker pattern is valid"));

/// A text-summarization backend
#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Summarizes `content` following `instruction`
    async fn summarize(&self, instruction: &str, content: &str) -> Result<String, SummarizeError>;
}

/// Trims a generated summary and turns line-leading `- ` markers into bullets
///
/// # Example
///
/// ```
/// use newsletter_digest::summarize::normalize_summary;
///
/// assert_eq!(normalize_summary("\n- one\n- two\n"), "• one\n• two");
/// ```
pub fn normalize_summary(text: &str) -> String {
    DASH_MARKER.replace_all(text.trim(), "• ").into_owned()
}

/// Summarizer client with normalization and placeholder fallback
#[derive(Clone)]
pub struct Summarizer {
    service: Arc<dyn SummarizationService>,
}

impl Summarizer {
    /// Wraps a summarization backend
    pub fn new(service: Arc<dyn SummarizationService>) -> Self {
        Self { service }
    }

    /// Summarizes a message body
    ///
    /// Never fails: any backend error yields [`SUMMARY_UNAVAILABLE`].
    pub async fn summarize(&self, body: &str) -> String {
        match self.service.summarize(SUMMARY_INSTRUCTION, body).await {
            Ok(summary) => normalize_summary(&summary),
            Err(e) => {
                tracing::warn!("Error generating summary: {}", e);
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}
