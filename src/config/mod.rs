//! Configuration module for Page Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an absent file yields a usable configuration.
//!
//! # Example
//!
//! ```no_run
//! use page_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, ScheduleConfig, UserAgentConfig};

pub use parser::{load_config, parse_config};
pub use validation::{
    validate, MAX_DELAY_SECONDS, MAX_LOOP_INTERVAL_MINUTES, MAX_PAGES_LIMIT, MIN_DELAY_SECONDS,
    MIN_LOOP_INTERVAL_MINUTES, MIN_PAGES_LIMIT,
};
