//! Raw-message sources

use crate::message::RawMessage;
use crate::SourceError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::path::Path;

/// Provides the raw messages of one batch
///
/// A failed listing aborts the run; a failed fetch only skips that message.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Lists the ids of the messages in the batch, in batch order
    async fn list_message_ids(&self) -> Result<Vec<String>, SourceError>;

    /// Fetches the full detail of one message
    async fn fetch_message(&self, id: &str) -> Result<RawMessage, SourceError>;
}

/// One listed entry: decoded up front, or kept raw when it did not decode
#[derive(Debug, Clone)]
enum Entry {
    Decoded(RawMessage),
    Undecodable(serde_json::Value),
}

/// Message source backed by a JSON array of raw messages
///
/// Stands in for a mailbox transport: export a batch to a file, then point the
/// CLI at it. Each entry is decoded on its own, so a malformed entry only
/// fails its own fetch. Ids must be unique within a batch.
#[derive(Debug, Clone, Default)]
pub struct JsonFileSource {
    entries: Vec<(String, Entry)>,
}

impl JsonFileSource {
    /// Reads a JSON array of raw messages
    ///
    /// Only an unreadable file, a top-level value that is not an array, or a
    /// repeated id fails the load.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path)?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)?;

        let mut source = Self::default();
        for (index, value) in values.into_iter().enumerate() {
            let id = value
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));

            let entry = match serde_json::from_value::<RawMessage>(value.clone()) {
                Ok(message) => Entry::Decoded(message),
                Err(e) => {
                    tracing::debug!("Entry {} did not decode: {}", id, e);
                    Entry::Undecodable(value)
                }
            };
            source.push(id, entry)?;
        }

        tracing::info!("Loaded {} messages from {}", source.len(), path.display());
        Ok(source)
    }

    /// Wraps messages that are already in memory
    pub fn from_messages(messages: Vec<RawMessage>) -> Result<Self, SourceError> {
        let mut source = Self::default();
        for message in messages {
            source.push(message.id.clone(), Entry::Decoded(message))?;
        }
        Ok(source)
    }

    fn push(&mut self, id: String, entry: Entry) -> Result<(), SourceError> {
        if self.entries.iter().any(|(existing, _)| *existing == id) {
            return Err(SourceError::DuplicateId(id));
        }
        self.entries.push((id, entry));
        Ok(())
    }

    /// Keeps only messages sent within `window` before `now`
    ///
    /// Entries that did not decode are kept so their fetch reports the failure.
    pub fn within_window(mut self, window: Duration, now: DateTime<Utc>) -> Self {
        let Some(cutoff) = now.checked_sub_signed(window) else {
            return self;
        };

        let before = self.entries.len();
        self.entries.retain(|(_, entry)| match entry {
            Entry::Decoded(message) => message.date_sent >= cutoff,
            Entry::Undecodable(_) => true,
        });
        tracing::debug!(
            "Recency window kept {} of {} messages (since {})",
            self.entries.len(),
            before,
            cutoff
        );
        self
    }

    /// Number of messages in the batch
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MessageSource for JsonFileSource {
    async fn list_message_ids(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.entries.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn fetch_message(&self, id: &str) -> Result<RawMessage, SourceError> {
        let (_, entry) = self
            .entries
            .iter()
            .find(|(existing, _)| existing == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

        match entry {
            Entry::Decoded(message) => Ok(message.clone()),
            Entry::Undecodable(value) => Ok(serde_json::from_value(value.clone())?),
        }
    }
}
