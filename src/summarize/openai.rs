//! OpenAI-compatible chat-completions backend

use crate::config::SummarizerConfig;
use crate::summarize::SummarizationService;
use crate::SummarizeError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatResponseOrError {
    Response(ChatResponse),
    Error(ApiErrorEnvelope),
}

/// Summarization over an OpenAI-style `/v1/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct OpenAiSummarizer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl OpenAiSummarizer {
    /// Creates a summarizer with an explicit API key
    pub fn new(client: Client, endpoint: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key,
            api_key_env: String::new(),
        }
    }

    /// Builds a summarizer from configuration, reading the key from the environment
    ///
    /// A missing key is not an error here; every call then fails and the
    /// caller falls back to its placeholder.
    pub fn from_config(config: &SummarizerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; summaries will be unavailable",
                config.api_key_env
            );
        }

        let mut summarizer = Self::new(client, &config.endpoint, &config.model, api_key);
        summarizer.api_key_env = config.api_key_env.clone();
        Ok(summarizer)
    }
}

#[async_trait]
impl SummarizationService for OpenAiSummarizer {
    async fn summarize(&self, instruction: &str, content: &str) -> Result<String, SummarizeError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SummarizeError::MissingApiKey(self.api_key_env.clone()))?;

        let prompt = format!("{}\n\nEmail content:\n{}\n", instruction, content);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&json!({
                "model": &self.model,
                "messages": [
                    { "role": "user", "content": prompt }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<ChatResponseOrError>(&body)
            .map_err(|e| SummarizeError::Malformed(format!("{}: {}", e, body)))?;

        match parsed {
            ChatResponseOrError::Error(envelope) => Err(SummarizeError::Service {
                status: status.as_u16(),
                message: envelope.error.message,
            }),
            ChatResponseOrError::Response(_) if !status.is_success() => {
                Err(SummarizeError::Service {
                    status: status.as_u16(),
                    message: body,
                })
            }
            ChatResponseOrError::Response(chat) => chat
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or_else(|| SummarizeError::Malformed("no choices in response".to_string())),
        }
    }
}
