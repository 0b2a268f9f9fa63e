//! Crawler module for page fetching and traversal
//!
//! This module contains the crawl pipeline:
//! - HTTP fetching with a timeout and identifying user agent
//! - The per-session frontier and visited set
//! - The crawl state machine
//! - Progress events and cooperative stop
//! - The breadth-first crawl loop

mod engine;
mod events;
mod fetcher;
mod session;
mod state;

pub use engine::{CrawlEngine, ROBOTS_DISALLOWED};
pub use events::{CrawlEvent, Progress, StopHandle};
pub use fetcher::{build_http_client, PageFetcher};
pub use session::CrawlSession;
pub use state::CrawlState;
