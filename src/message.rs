//! Message data model
//!
//! Raw messages come from a [`MessageSource`](crate::pipeline::MessageSource);
//! enriched messages and their links are what the digest is made of.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used when a message has no Subject header
pub const NO_SUBJECT: &str = "(No Subject)";

/// Placeholder used when a message has no From header
pub const UNKNOWN_SENDER: &str = "(Unknown Sender)";

/// A message as delivered by the mailbox transport
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    /// Opaque identifier assigned by the source
    pub id: String,

    /// Sender header value, e.g. `Weekly <news@substack.com>`
    #[serde(default = "unknown_sender")]
    pub from: String,

    /// Subject header value
    #[serde(default = "no_subject")]
    pub subject: String,

    /// When the message was sent
    #[serde(deserialize_with = "deserialize_date_sent")]
    pub date_sent: DateTime<Utc>,

    /// Decoded body text
    #[serde(default)]
    pub body: String,
}

fn unknown_sender() -> String {
    UNKNOWN_SENDER.to_string()
}

fn no_subject() -> String {
    NO_SUBJECT.to_string()
}

/// Accepts either an RFC 3339 timestamp or an RFC 2822 mail `Date` header
fn deserialize_date_sent<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_sent(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unrecognized date format: '{}'", raw))
    })
}

/// Parses a send date from RFC 3339 or RFC 2822 text
pub fn parse_date_sent(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// An outbound link found in a message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// The URL exactly as it appeared in the body
    pub url: String,

    /// The URL after redirect resolution (the original URL when probing failed)
    #[serde(skip)]
    pub resolved_url: String,

    /// Page title, or text synthesized from the URL
    #[serde(rename = "text")]
    pub display_text: String,
}

/// A newsletter with its summary and resolved links attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMessage {
    pub from: String,
    pub subject: String,
    pub date_sent: DateTime<Utc>,
    pub summary: String,
    pub links: Vec<Link>,
}
