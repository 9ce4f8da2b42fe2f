//! Digest pipeline
//!
//! This module contains the batch flow:
//! - Listing and fetching raw messages from a [`MessageSource`]
//! - Enriching each qualifying message (summary + links)
//! - Grouping the results by calendar day

mod aggregate;
mod enricher;
mod source;
mod stats;

pub use aggregate::{DayAggregator, DayBuckets, DAY_KEY_FORMAT};
pub use enricher::MessageEnricher;
pub use source::{JsonFileSource, MessageSource};
pub use stats::{print_statistics, DigestStats};

use crate::classify::NewsletterClassifier;
use crate::config::Config;
use crate::links::build_link_extractor;
use crate::message::{EnrichedMessage, RawMessage};
use crate::summarize::{OpenAiSummarizer, Summarizer};
use crate::{ConfigError, DigestError};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Result of a digest run
#[derive(Debug, Clone, Default)]
pub struct DigestRun {
    /// Enriched messages by day key
    pub days: DayBuckets,

    /// Counters for the run
    pub stats: DigestStats,
}

/// What happened to one listed message
enum MessageOutcome {
    Enriched(EnrichedMessage),
    Dropped,
    FetchFailed,
}

/// Runs a batch from a message source to a day-bucketed digest
#[derive(Clone)]
pub struct Pipeline {
    enricher: MessageEnricher,
    aggregator: DayAggregator,
    max_concurrent_messages: usize,
}

impl Pipeline {
    /// Creates a pipeline from its parts
    pub fn new(
        enricher: MessageEnricher,
        aggregator: DayAggregator,
        max_concurrent_messages: usize,
    ) -> Self {
        Self {
            enricher,
            aggregator,
            max_concurrent_messages: max_concurrent_messages.max(1),
        }
    }

    /// Builds a pipeline with the HTTP link fetcher and the configured summarizer
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(DigestError)` - An HTTP client could not be built or the offset is invalid
    pub fn from_config(config: &Config) -> Result<Self, DigestError> {
        let classifier = NewsletterClassifier::new(&config.classifier);
        let summarizer = Summarizer::new(Arc::new(OpenAiSummarizer::from_config(
            &config.summarizer,
        )?));
        let links = build_link_extractor(config)?;

        let aggregator = DayAggregator::from_offset_minutes(config.digest.utc_offset_minutes)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "utc_offset_minutes out of range: {}",
                    config.digest.utc_offset_minutes
                ))
            })?;

        Ok(Self::new(
            MessageEnricher::new(classifier, summarizer, links),
            aggregator,
            config.digest.max_concurrent_messages,
        ))
    }

    /// The day aggregator used for this pipeline's buckets
    pub fn aggregator(&self) -> &DayAggregator {
        &self.aggregator
    }

    /// Runs one batch
    ///
    /// A listing failure is returned as an error. Messages are enriched
    /// concurrently, but results are collected in listing order, so each day
    /// keeps the order of the batch regardless of which message finished first.
    pub async fn run(&self, source: &dyn MessageSource) -> Result<DigestRun, DigestError> {
        let ids = source.list_message_ids().await?;

        let mut stats = DigestStats {
            messages_listed: ids.len(),
            ..DigestStats::default()
        };

        if ids.is_empty() {
            tracing::info!("No messages found in batch");
            return Ok(DigestRun {
                days: DayBuckets::new(),
                stats,
            });
        }

        tracing::info!("Processing {} messages", ids.len());

        let outcomes: Vec<MessageOutcome> = stream::iter(ids.iter())
            .map(|id| self.process_message(source, id))
            .buffered(self.max_concurrent_messages)
            .collect()
            .await;

        let mut records = Vec::new();
        for outcome in outcomes {
            match outcome {
                MessageOutcome::Enriched(record) => records.push(record),
                MessageOutcome::Dropped => stats.messages_dropped += 1,
                MessageOutcome::FetchFailed => stats.fetch_failures += 1,
            }
        }

        let days = self.aggregator.aggregate(records);
        stats.record_days(&days);

        tracing::info!(
            "Digest complete: {} newsletters across {} days ({} skipped, {} fetch failures)",
            stats.messages_enriched,
            stats.days,
            stats.messages_dropped,
            stats.fetch_failures
        );

        Ok(DigestRun { days, stats })
    }

    /// Enriches the records of an already-fetched batch, in input order
    pub async fn enrich_all(&self, messages: &[RawMessage]) -> DayBuckets {
        let records: Vec<Option<EnrichedMessage>> = stream::iter(messages.iter())
            .map(|message| self.enricher.enrich(message))
            .buffered(self.max_concurrent_messages)
            .collect()
            .await;

        self.aggregator.aggregate(records.into_iter().flatten())
    }

    async fn process_message(&self, source: &dyn MessageSource, id: &str) -> MessageOutcome {
        let message = match source.fetch_message(id).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Error fetching message ID {}: {}", id, e);
                return MessageOutcome::FetchFailed;
            }
        };

        match self.enricher.enrich(&message).await {
            Some(record) => MessageOutcome::Enriched(record),
            None => MessageOutcome::Dropped,
        }
    }
}
