//! Robots.txt handling module
//!
//! When enabled, a crawl session reads the seed host's robots.txt once and
//! consults it before each fetch. Any failure to obtain the file means
//! everything is allowed.

mod parser;

pub use parser::RobotsPolicy;

use reqwest::Client;
use url::Url;

/// Fetches and parses robots.txt for the site of `site_url`
///
/// Network errors, non-2xx statuses and unreadable bodies all produce
/// [`RobotsPolicy::allow_all`].
pub async fn fetch_robots(client: &Client, site_url: &Url, user_agent: &str) -> RobotsPolicy {
    let mut robots_url = site_url.clone();
    robots_url.set_path("/robots.txt");
    robots_url.set_query(None);
    robots_url.set_fragment(None);

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            tracing::debug!("No robots.txt at {} (HTTP {})", robots_url, r.status());
            return RobotsPolicy::allow_all();
        }
        Err(e) => {
            tracing::warn!("Could not read robots.txt at {}: {}", robots_url, e);
            return RobotsPolicy::allow_all();
        }
    };

    match response.text().await {
        Ok(body) => {
            tracing::info!("Parsed robots.txt from {}", robots_url);
            RobotsPolicy::from_body(&body, user_agent)
        }
        Err(e) => {
            tracing::warn!("Could not read robots.txt body at {}: {}", robots_url, e);
            RobotsPolicy::allow_all()
        }
    }
}
