//! Crawl session state
//!
//! A session owns everything one crawl mutates: the frontier, the visited
//! set, and the accumulated results. Sessions are independent of each other,
//! so several can exist side by side; a new crawl always starts a new one.

use crate::config::{MAX_DELAY_SECONDS, MAX_PAGES_LIMIT, MIN_DELAY_SECONDS, MIN_PAGES_LIMIT};
use crate::crawler::CrawlState;
use crate::model::PageRecord;
use crate::store::ResultStore;
use crate::url::{normalize_seed, same_site, strip_fragment};
use crate::HarvestError;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// One crawl: seed, limits, frontier, visited set and results
#[derive(Debug)]
pub struct CrawlSession {
    seed: String,
    seed_url: Option<Url>,
    max_pages: u32,
    delay_seconds: f64,
    frontier: VecDeque<Url>,
    /// Everything ever queued, so a URL is enqueued at most once
    queued: HashSet<String>,
    visited: HashSet<String>,
    results: ResultStore,
    state: CrawlState,
    failure: Option<String>,
}

impl CrawlSession {
    /// Creates an idle session
    ///
    /// Nothing is validated here; [`CrawlSession::begin`] checks the seed and
    /// limits and moves the session to `Running` or `Failed`.
    pub fn new(seed: impl Into<String>, max_pages: u32, delay_seconds: f64) -> Self {
        Self {
            seed: seed.into(),
            seed_url: None,
            max_pages,
            delay_seconds,
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            results: ResultStore::new(),
            state: CrawlState::Idle,
            failure: None,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The normalized seed, available once the session has started
    pub fn seed_url(&self) -> Option<&Url> {
        self.seed_url.as_ref()
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages as usize
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds)
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Why the session failed, if it did
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn into_results(self) -> ResultStore {
        self.results
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Returns true once the page limit is consumed
    pub fn limit_reached(&self) -> bool {
        self.visited.len() >= self.max_pages()
    }

    /// Validates the seed and limits, seeds the frontier, and enters `Running`
    ///
    /// On any problem the session moves to `Failed` and the reason is kept.
    pub fn begin(&mut self) -> Result<&Url, HarvestError> {
        match self.prepare() {
            Ok(seed) => {
                self.transition(CrawlState::Running)?;
                self.queued.insert(seed.to_string());
                self.frontier.push_back(seed.clone());
                Ok(self.seed_url.insert(seed))
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn prepare(&self) -> Result<Url, HarvestError> {
        if !(MIN_PAGES_LIMIT..=MAX_PAGES_LIMIT).contains(&self.max_pages) {
            return Err(crate::ConfigError::Validation(format!(
                "max pages must be between {} and {}, got {}",
                MIN_PAGES_LIMIT, MAX_PAGES_LIMIT, self.max_pages
            ))
            .into());
        }
        if !(MIN_DELAY_SECONDS..=MAX_DELAY_SECONDS).contains(&self.delay_seconds) {
            return Err(crate::ConfigError::Validation(format!(
                "delay must be between {} and {} seconds, got {}",
                MIN_DELAY_SECONDS, MAX_DELAY_SECONDS, self.delay_seconds
            ))
            .into());
        }
        Ok(normalize_seed(&self.seed)?)
    }

    /// Pops the next unvisited URL in FIFO order
    pub fn next_url(&mut self) -> Option<Url> {
        while let Some(url) = self.frontier.pop_front() {
            if !self.visited.contains(url.as_str()) {
                return Some(url);
            }
        }
        None
    }

    /// Stores a page's record and marks its URL visited
    pub fn record(&mut self, url: &Url, record: PageRecord) {
        self.visited.insert(url.to_string());
        self.results.push(record);
    }

    /// Queues a discovered link if it is on the seed's site and new
    ///
    /// Returns true if the link was added to the frontier.
    pub fn enqueue(&mut self, link: &str) -> bool {
        let Some(seed) = &self.seed_url else {
            return false;
        };
        let Ok(url) = Url::parse(link) else {
            return false;
        };
        let url = strip_fragment(url);

        if !same_site(seed, &url) {
            return false;
        }

        let key = url.to_string();
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return false;
        }

        self.queued.insert(key);
        self.frontier.push_back(url);
        true
    }

    /// Moves to a new state if the state machine allows it
    pub fn transition(&mut self, to: CrawlState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!("Session {}: {} -> {}", self.seed, self.state, to);
        self.state = to;
        Ok(())
    }

    fn fail(&mut self, reason: String) {
        if self.state.can_transition_to(CrawlState::Failed) {
            self.state = CrawlState::Failed;
        }
        self.failure = Some(reason);
    }
}
