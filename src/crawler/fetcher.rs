//! HTTP fetcher implementation
//!
//! One GET per URL, no retries. Every failure (connection error, timeout,
//! non-2xx status, non-HTML content type, unreadable body) is returned as a
//! [`FetchError`] carrying the URL and reason.

use crate::config::UserAgentConfig;
use crate::{FetchError, FetchFailure};
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Content types accepted as HTML documents
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use page_harvester::config::UserAgentConfig;
/// use page_harvester::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches HTML pages for the crawler
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    user_agent: String,
}

impl PageFetcher {
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
            user_agent: config.header_value(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The User-Agent header value sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches `url` and returns its HTML body
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let fail = |reason: FetchFailure| FetchError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| fail(classify(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(FetchFailure::Status(status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(fail(FetchFailure::NotHtml(content_type)));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                fail(FetchFailure::Timeout)
            } else {
                fail(FetchFailure::Body(e.to_string()))
            }
        })
    }
}

/// Classifies a transport error
fn classify(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() {
        FetchFailure::Connect(error.to_string())
    } else {
        FetchFailure::Other(error.to_string())
    }
}

/// Returns true if the Content-Type header names an HTML document
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    HTML_CONTENT_TYPES.contains(&mime.as_str())
}
