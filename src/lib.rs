//! Page Harvester: a polite structured-data crawler
//!
//! This crate fetches web pages breadth-first from a seed URL, extracts
//! structured content (metadata, tables, text, links, lists, forms and
//! JSON-LD) and exports the accumulated records as JSON, CSV, XLSX or SQLite.

pub mod config;
pub mod crawler;
pub mod export;
pub mod extract;
pub mod logging;
pub mod model;
pub mod robots;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for Page Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: crawler::CrawlState,
        to: crawler::CrawlState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Why a single page fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request did not complete within the configured timeout
    Timeout,

    /// The connection could not be established
    Connect(String),

    /// The server answered with a non-2xx status
    Status(u16),

    /// The response was not an HTML document
    NotHtml(String),

    /// The response body could not be read
    Body(String),

    /// Any other transport failure
    Other(String),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::NotHtml(ct) if ct.is_empty() => write!(f, "missing content type"),
            Self::NotHtml(ct) => write!(f, "not HTML (content type {})", ct),
            Self::Body(e) => write!(f, "failed to read body: {}", e),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

/// A failed fetch, carrying the URL and the reason
///
/// The crawler records these as failure records; they never abort a crawl.
#[derive(Debug, Clone, Error)]
#[error("{url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: FetchFailure,
}

/// Result type alias for Page Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlEvent, CrawlSession, CrawlState, StopHandle};
pub use export::{export, ExportFormat};
pub use extract::extract;
pub use model::PageRecord;
pub use store::ResultStore;
