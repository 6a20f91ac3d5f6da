//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Single-hop GET requests; redirects are handed back to the crawler,
//!   which checks each target against its visited set before following it
//! - Error classification into [`FetchError`] kinds

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::PageState;
use async_trait::async_trait;
use reqwest::{
    header::{CONTENT_TYPE, LOCATION},
    redirect::Policy,
    Client,
};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Redirect hops followed for one task before giving up
pub const MAX_REDIRECTS: usize = 10;

/// Why a single page could not be fetched
///
/// None of these abort a crawl; the crawler records them and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Host unreachable for {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentType { url: String, content_type: String },

    /// Redirect without a usable Location, or too many hops
    #[error("Bad redirect from {url}: {message}")]
    Redirect { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::Unreachable { url, .. }
            | Self::Timeout { url }
            | Self::BadStatus { url, .. }
            | Self::ContentType { url, .. }
            | Self::Redirect { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    /// Maps the failure onto the page state recorded for the task
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Unreachable { .. } => PageState::Unreachable,
            Self::Timeout { .. } => PageState::Timeout,
            Self::BadStatus { status, .. } if *status == 404 || *status == 410 => {
                PageState::DeadLink
            }
            Self::BadStatus { .. } => PageState::HttpError,
            Self::ContentType { .. } => PageState::ContentMismatch,
            Self::Redirect { .. } | Self::Body { .. } | Self::Request { .. } => PageState::Failed,
        }
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Unreachable {
                url,
                message: error.to_string(),
            }
        } else {
            Self::Request {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// A successfully fetched HTML document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that served the document, after any redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Page body
    pub body: String,
}

/// Result of one request
#[derive(Debug, Clone)]
pub enum FetchResponse {
    /// An HTML document
    Page(FetchedPage),

    /// A 3xx reply pointing at `location`, resolved against the request URL
    Redirect { location: Url },
}

/// Source of HTML documents for the crawler
///
/// The crawler only talks to the network through this trait, so tests can
/// substitute a stub that counts or scripts fetches. Implementations must
/// not follow redirects themselves.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Requests one URL
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use gleaner::config::{CrawlerConfig, UserAgentConfig};
/// use gleaner::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout_seconds);

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none()) // Redirects are followed by the crawler
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from crawler and user agent settings
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, crawler)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Requests a URL once and classifies the reply
///
/// A client built by [`build_http_client`] does not follow redirects, so a
/// 3xx reply comes back as [`FetchResponse::Redirect`].
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection refused, DNS, TLS | `Unreachable` |
/// | Timeout (connect or overall) | `Timeout` |
/// | 3xx without a valid Location | `Redirect` |
/// | Other non-2xx | `BadStatus` |
/// | Content-Type present and not HTML | `ContentType` |
/// | Body could not be decoded | `Body` |
/// | Anything else | `Request` |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchResponse, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    let final_url = response.url().clone();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| FetchError::Redirect {
                url: url.to_string(),
                message: format!("HTTP {} without a Location header", status.as_u16()),
            })?;
        let location = final_url.join(location).map_err(|e| FetchError::Redirect {
            url: url.to_string(),
            message: format!("invalid Location {:?}: {}", location, e),
        })?;
        return Ok(FetchResponse::Redirect { location });
    }

    if !status.is_success() {
        return Err(FetchError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(ct) = &content_type {
        if !is_html_content_type(ct) {
            return Err(FetchError::ContentType {
                url: url.to_string(),
                content_type: ct.clone(),
            });
        }
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    Ok(FetchResponse::Page(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    }))
}

/// Returns true for HTML and XHTML media types (parameters such as charset are ignored)
fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "text/html" || media_type == "application/xhtml+xml"
}
