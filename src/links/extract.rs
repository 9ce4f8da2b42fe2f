//! Link extraction from message bodies

use crate::links::resolver::LinkResolver;
use crate::message::Link;
use futures::future::join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// Finds distinct URLs in text, in order of first appearance, keeping at most `max`
///
/// A URL is `http://` or `https://` followed by every non-whitespace character
/// up to the next whitespace. Trailing punctuation is kept as found.
///
/// # Examples
///
/// ```
/// use newsletter_digest::links::find_urls;
///
/// let body = "See https://a.example/x and https://b.example, then https://a.example/x";
/// assert_eq!(find_urls(body, 10), vec!["https://a.example/x", "https://b.example,"]);
/// ```
pub fn find_urls(body: &str, max: usize) -> Vec<String> {
    let mut seen = HashSet::new();

    URL_PATTERN
        .find_iter(body)
        .map(|m| m.as_str())
        .filter(|url| seen.insert(*url))
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Extracts and resolves the links of a message body
#[derive(Clone)]
pub struct LinkExtractor {
    resolver: LinkResolver,
    max_links: usize,
}

impl LinkExtractor {
    /// Creates an extractor keeping at most `max_links` distinct URLs per body
    pub fn new(resolver: LinkResolver, max_links: usize) -> Self {
        Self {
            resolver,
            max_links,
        }
    }

    /// Finds, deduplicates, caps and resolves the links in `body`
    ///
    /// All resolutions run concurrently (bounded by the resolver's semaphore)
    /// and the result keeps first-seen order whatever order they finish in.
    pub async fn extract_links(&self, body: &str) -> Vec<Link> {
        let urls = find_urls(body, self.max_links);
        if urls.is_empty() {
            return Vec::new();
        }

        tracing::debug!("Resolving {} links", urls.len());
        join_all(urls.iter().map(|url| self.resolver.resolve(url))).await
    }
}
