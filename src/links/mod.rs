//! Link handling for Newsletter Digest
//!
//! This module turns message bodies into titled links:
//! - Scanning text for URLs, deduplicating and capping them
//! - Probing each URL for redirects and fetching its page title
//! - Synthesizing display text when the title cannot be obtained

mod extract;
mod fallback;
mod fetcher;
mod resolver;
mod title;

pub use extract::{find_urls, LinkExtractor};
pub use fallback::{infer_link_text, GENERIC_LINK_TEXT};
pub use fetcher::{build_http_client, user_agent_string, HttpTitleFetcher, TitleFetcher};
pub use resolver::LinkResolver;
pub use title::{descriptive_title, extract_title, MIN_TITLE_CHARS};

use crate::config::Config;
use std::sync::Arc;

/// Builds a link extractor backed by the HTTP fetcher
///
/// # Arguments
///
/// * `config` - The digest configuration
///
/// # Returns
///
/// * `Ok(LinkExtractor)` - Ready to resolve links
/// * `Err(reqwest::Error)` - The HTTP client could not be built
pub fn build_link_extractor(config: &Config) -> Result<LinkExtractor, reqwest::Error> {
    let fetcher = HttpTitleFetcher::from_config(&config.user_agent, &config.links)?;
    let resolver = LinkResolver::new(Arc::new(fetcher), config.links.max_concurrent_resolutions);
    Ok(LinkExtractor::new(
        resolver,
        config.links.max_links_per_message,
    ))
}
