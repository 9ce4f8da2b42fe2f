//! Newsletter classification
//!
//! Decides from the sender and subject alone whether a message belongs in the
//! digest. Classification is pure: no I/O and no state between calls.

mod matcher;

use crate::config::ClassifierConfig;

pub use matcher::{contains_any, contains_any_ignore_case};

/// Message classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageClassification {
    /// Looks like a newsletter and is not excluded
    Newsletter,
    /// Sender matches an excluded domain (overrides every other rule)
    Excluded,
    /// Neither a newsletter sender nor a newsletter subject
    Personal,
}

impl MessageClassification {
    /// Returns true if the message should be enriched
    pub fn is_newsletter(&self) -> bool {
        matches!(self, Self::Newsletter)
    }
}

/// Heuristic newsletter detector built from [`ClassifierConfig`]
#[derive(Debug, Clone)]
pub struct NewsletterClassifier {
    newsletter_domains: Vec<String>,
    subject_keywords: Vec<String>,
    excluded_domains: Vec<String>,
}

impl NewsletterClassifier {
    /// Creates a classifier from configuration
    ///
    /// Subject keywords are lowered once here so each check only lowers the subject.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            newsletter_domains: config.newsletter_domains.clone(),
            subject_keywords: config
                .subject_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            excluded_domains: config.excluded_domains.clone(),
        }
    }

    /// Classifies a message by sender and subject
    ///
    /// Rules are checked in priority order:
    /// 1. Excluded domain in `from` (highest priority)
    /// 2. Newsletter domain in `from`, or keyword in `subject` (case-insensitive)
    /// 3. Personal (default)
    ///
    /// # Examples
    ///
    /// ```
    /// use newsletter_digest::config::ClassifierConfig;
    /// use newsletter_digest::classify::{MessageClassification, NewsletterClassifier};
    ///
    /// let classifier = NewsletterClassifier::new(&ClassifierConfig::default());
    /// assert_eq!(
    ///     classifier.classify_message("alerts@google.com", "Weekly Digest"),
    ///     MessageClassification::Excluded
    /// );
    /// ```
    pub fn classify_message(&self, from: &str, subject: &str) -> MessageClassification {
        if contains_any(from, &self.excluded_domains) {
            return MessageClassification::Excluded;
        }

        if contains_any(from, &self.newsletter_domains)
            || contains_any_ignore_case(subject, &self.subject_keywords)
        {
            return MessageClassification::Newsletter;
        }

        MessageClassification::Personal
    }

    /// Returns true if the message is an eligible newsletter
    pub fn classify(&self, from: &str, subject: &str) -> bool {
        self.classify_message(from, subject).is_newsletter()
    }
}

impl Default for NewsletterClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
