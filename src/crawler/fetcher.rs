//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building HTTP clients with a proper user agent string
//! - GET requests returning the page body
//! - Error classification
//!
//! There is no retry. A failed fetch is reported to the caller, which
//! applies the configured error policy.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use scraper::Html;
use std::time::Duration;
use thiserror::Error;

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// A listing entry carried no link to follow
    #[error("no URL to fetch")]
    MissingUrl,

    /// Connection refused, DNS failure, invalid URL, timeout and the like
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(StatusCode),

    /// The response body could not be read
    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// A fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Raw HTML body
    pub body: String,
}

impl Page {
    /// Parses the body into a navigable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::{CrawlerConfig, UserAgentConfig};
/// use catalog_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    let mut builder = Client::builder().user_agent(user_agent).gzip(true).brotli(true);

    if let Some(secs) = crawler.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and returns its body
///
/// | Condition | Result |
/// |-----------|--------|
/// | Empty URL | `FetchError::MissingUrl` |
/// | 2xx | `Ok(Page)` |
/// | Any other status | `FetchError::Status` |
/// | Network failure | `FetchError::Transport` |
/// | Body read failure | `FetchError::Body` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<Page, FetchError> {
    if url.is_empty() {
        return Err(FetchError::MissingUrl);
    }

    let response = client.get(url).send().await.map_err(FetchError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let body = response.text().await.map_err(FetchError::Body)?;
    tracing::trace!("Fetched {} ({} bytes)", url, body.len());

    Ok(Page { body })
}
