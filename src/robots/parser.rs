//! Robots.txt rules for a single user agent

use robotstxt::DefaultMatcher;

/// The robots.txt rules that apply to this crawler
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Raw robots.txt body; `None` allows everything
    body: Option<String>,
    /// Product token matched against `User-agent` lines
    agent: String,
}

impl RobotsPolicy {
    /// Builds a policy from a robots.txt body
    ///
    /// `user_agent` may be a full header value; only the product token
    /// before the first `/` or space is matched.
    pub fn from_body(body: &str, user_agent: &str) -> Self {
        let agent = user_agent
            .split(|c: char| c == '/' || c.is_whitespace())
            .next()
            .unwrap_or(user_agent)
            .to_string();

        Self {
            body: Some(body.to_string()),
            agent,
        }
    }

    /// A policy that permits every URL and requests no delay
    pub fn allow_all() -> Self {
        Self {
            body: None,
            agent: String::new(),
        }
    }

    /// Checks whether `url` may be fetched
    pub fn permits(&self, url: &str) -> bool {
        match &self.body {
            Some(body) if !body.trim().is_empty() => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, &self.agent, url)
            }
            _ => true,
        }
    }

    /// Returns the `Crawl-delay` (seconds) for this agent, falling back to `*`
    pub fn crawl_delay(&self) -> Option<f64> {
        let body = self.body.as_deref()?;
        let agent = self.agent.to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut in_agent_lines = false;
        let mut specific = None;
        let mut wildcard = None;

        for line in body.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                // Consecutive User-agent lines share one group
                if !in_agent_lines {
                    group.clear();
                }
                group.push(value.to_lowercase());
                in_agent_lines = true;
                continue;
            }
            in_agent_lines = false;

            if key != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };
            if !delay.is_finite() || delay < 0.0 {
                continue;
            }

            if !agent.is_empty() && group.iter().any(|ua| ua == &agent) {
                specific.get_or_insert(delay);
            } else if group.iter().any(|ua| ua == "*") {
                wildcard.get_or_insert(delay);
            }
        }

        specific.or(wildcard)
    }
}
