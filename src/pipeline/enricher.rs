//! Per-message enrichment

use crate::classify::{MessageClassification, NewsletterClassifier};
use crate::links::LinkExtractor;
use crate::message::{EnrichedMessage, RawMessage};
use crate::summarize::Summarizer;

/// Combines classification, summarization and link extraction for one message
#[derive(Clone)]
pub struct MessageEnricher {
    classifier: NewsletterClassifier,
    summarizer: Summarizer,
    links: LinkExtractor,
}

impl MessageEnricher {
    pub fn new(
        classifier: NewsletterClassifier,
        summarizer: Summarizer,
        links: LinkExtractor,
    ) -> Self {
        Self {
            classifier,
            summarizer,
            links,
        }
    }

    /// Enriches a message, or returns `None` if it is not an eligible newsletter
    ///
    /// Disqualified messages cause no network traffic. For qualifying ones the
    /// summary and the links are produced concurrently; both recover from their
    /// own failures, so a record is always returned.
    pub async fn enrich(&self, message: &RawMessage) -> Option<EnrichedMessage> {
        let classification = self
            .classifier
            .classify_message(&message.from, &message.subject);

        if !classification.is_newsletter() {
            match classification {
                MessageClassification::Excluded => {
                    tracing::debug!("Message {} excluded (sender {})", message.id, message.from)
                }
                _ => tracing::trace!("Message {} is not a newsletter", message.id),
            }
            return None;
        }

        tracing::debug!("Enriching message {}: {}", message.id, message.subject);

        let (summary, links) = tokio::join!(
            self.summarizer.summarize(&message.body),
            self.links.extract_links(&message.body)
        );

        Some(EnrichedMessage {
            from: message.from.clone(),
            subject: message.subject.clone(),
            date_sent: message.date_sent,
            summary,
            links,
        })
    }
}
