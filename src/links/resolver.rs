//! Link resolution: redirect probe, title fetch, fallback text

use crate::links::fallback::infer_link_text;
use crate::links::fetcher::TitleFetcher;
use crate::links::title::descriptive_title;
use crate::message::Link;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Resolves URLs into [`Link`]s
///
/// The resolver owns a semaphore shared by every message in a run, so the
/// number of outbound resolutions in flight never exceeds the configured cap.
#[derive(Clone)]
pub struct LinkResolver {
    fetcher: Arc<dyn TitleFetcher>,
    permits: Arc<Semaphore>,
}

impl LinkResolver {
    /// Creates a resolver allowing at most `max_concurrent` resolutions at once
    pub fn new(fetcher: Arc<dyn TitleFetcher>, max_concurrent: usize) -> Self {
        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Resolves a single URL into a link
    ///
    /// Never fails. The redirect probe falls back to the original URL; the
    /// title fetch falls back to text synthesized from the URL. When the page
    /// was fetched but had no usable title the text comes from the resolved
    /// URL, and when the fetch itself failed it comes from the original.
    pub async fn resolve(&self, url: &str) -> Link {
        // The semaphore is never closed; a failed acquire just runs unthrottled.
        let _permit = self.permits.acquire().await.ok();

        let resolved_url = match self.fetcher.resolve_redirect(url).await {
            Ok(resolved) => {
                if resolved != url {
                    tracing::debug!("Resolved {} -> {}", url, resolved);
                }
                resolved
            }
            Err(e) => {
                tracing::debug!("Redirect probe failed for {}: {}", url, e);
                url.to_string()
            }
        };

        let display_text = match self.fetcher.fetch_html(&resolved_url).await {
            Ok(html) => match descriptive_title(&html) {
                Some(title) => title,
                None => {
                    tracing::debug!("No usable title at {}, using URL text", resolved_url);
                    infer_link_text(&resolved_url)
                }
            },
            Err(e) => {
                tracing::debug!("Title fetch failed for {}: {}", url, e);
                infer_link_text(url)
            }
        };

        Link {
            url: url.to_string(),
            resolved_url,
            display_text,
        }
    }
}
