//! HTTP fetching for link resolution
//!
//! This module handles the two network steps of resolving a link:
//! - A HEAD probe that follows a bounded number of redirects
//! - A GET of the resolved page so its title can be read
//!
//! Both sit behind the [`TitleFetcher`] trait so the resolver can be driven by
//! a stub in tests.

use crate::config::{LinksConfig, UserAgentConfig};
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Network capability used by the link resolver
#[async_trait]
pub trait TitleFetcher: Send + Sync {
    /// Follows redirects from `url` and returns the final URL
    async fn resolve_redirect(&self, url: &str) -> FetchResult<String>;

    /// Fetches the HTML body at `url`
    async fn fetch_html(&self, url: &str) -> FetchResult<String>;
}

/// Formats the User-Agent header value
///
/// Format: `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.name, config.version, config.contact_url, config.contact_email
    )
}

/// Builds the HTTP client used for link resolution
///
/// Redirects are followed by reqwest itself, capped at `redirect_max_hops`.
/// Per-request timeouts are applied by [`HttpTitleFetcher`].
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    links: &LinksConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .connect_timeout(Duration::from_secs(5))
        .redirect(Policy::limited(links.redirect_max_hops))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`TitleFetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTitleFetcher {
    client: Client,
    probe_timeout: Duration,
    title_timeout: Duration,
}

impl HttpTitleFetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, probe_timeout: Duration, title_timeout: Duration) -> Self {
        Self {
            client,
            probe_timeout,
            title_timeout,
        }
    }

    /// Builds a client and fetcher from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        links: &LinksConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, links)?;
        Ok(Self::new(
            client,
            Duration::from_millis(links.redirect_probe_timeout),
            Duration::from_millis(links.title_fetch_timeout),
        ))
    }
}

/// Rejects anything that is not an absolute HTTP(S) URL before touching the network
fn parse_http_url(url: &str) -> FetchResult<Url> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            url, scheme
        ))),
    }
}

#[async_trait]
impl TitleFetcher for HttpTitleFetcher {
    async fn resolve_redirect(&self, url: &str) -> FetchResult<String> {
        let target = parse_http_url(url)?;

        let response = self
            .client
            .head(target)
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.url().to_string())
    }

    async fn fetch_html(&self, url: &str) -> FetchResult<String> {
        let target = parse_http_url(url)?;

        let response = self
            .client
            .get(target)
            .timeout(self.title_timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}
