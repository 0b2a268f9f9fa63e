//! Crawl engine - the breadth-first crawl loop
//!
//! The engine owns the HTTP fetcher, the event channel and the stop flag.
//! All per-crawl state lives in a [`CrawlSession`] that the engine mutates
//! while a crawl runs:
//!
//! 1. Pop the next unvisited URL from the frontier
//! 2. Check robots.txt (when enabled)
//! 3. Wait out the politeness delay
//! 4. Fetch and extract the page
//! 5. Record the result and enqueue newly found same-site links
//! 6. Emit a progress event
//!
//! In loop mode the whole seed batch is crawled again after a fixed pause,
//! accumulating results across cycles until a stop is requested.

use crate::config::{Config, CrawlerConfig, MAX_DELAY_SECONDS};
use crate::crawler::{CrawlEvent, CrawlSession, CrawlState, PageFetcher, Progress, StopHandle};
use crate::extract::extract_with_diagnostics;
use crate::model::PageRecord;
use crate::robots::{fetch_robots, RobotsPolicy};
use crate::store::ResultStore;
use crate::HarvestError;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use url::Url;

/// Reason stored on records for URLs excluded by robots.txt
pub const ROBOTS_DISALLOWED: &str = "disallowed by robots.txt";

/// Drives crawl sessions
pub struct CrawlEngine {
    fetcher: PageFetcher,
    config: CrawlerConfig,
    events: Option<UnboundedSender<CrawlEvent>>,
    stop: StopHandle,
}

/// Running totals reported in progress events
#[derive(Debug, Default)]
struct Tally {
    succeeded: usize,
    failed: usize,
    tables: usize,
    links: usize,
}

impl Tally {
    fn add(&mut self, record: &PageRecord) {
        if record.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.tables += record.tables.len();
        self.links += record.links.internal.len() + record.links.external.len();
    }
}

impl CrawlEngine {
    /// Creates an engine from the crawler and user agent settings
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to run sessions
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = PageFetcher::new(&config.user_agent, config.crawler.timeout())?;

        Ok(Self {
            fetcher,
            config: config.crawler.clone(),
            events: None,
            stop: StopHandle::new(),
        })
    }

    /// Returns a handle that can stop a running crawl from another task
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Requests a cooperative stop; the current fetch finishes first
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Opens the progress event channel
    ///
    /// Only one subscriber exists at a time; subscribing again replaces the
    /// previous receiver.
    pub fn subscribe(&mut self) -> UnboundedReceiver<CrawlEvent> {
        let (tx, rx) = unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Creates a fresh session for `seed` using the configured limits
    pub fn session(&self, seed: &str) -> CrawlSession {
        CrawlSession::new(seed, self.config.max_pages, self.config.delay_seconds)
    }

    /// Starts a new crawl and runs it to a terminal state
    ///
    /// Any earlier stop request is cleared first.
    pub async fn start(&self, seed: &str, max_pages: u32, delay_seconds: f64) -> CrawlSession {
        self.stop.reset();
        let mut session = CrawlSession::new(seed, max_pages, delay_seconds);
        self.run(&mut session).await;
        session
    }

    /// Crawls each seed in its own session and concatenates the results
    ///
    /// A failed seed does not end the batch; a stop request does.
    pub async fn crawl_all(&self, seeds: &[String]) -> ResultStore {
        self.stop.reset();
        self.crawl_batch(seeds).await.0
    }

    /// Crawls the seed batch repeatedly, pausing `interval` between cycles
    ///
    /// `on_cycle` runs after every completed cycle with the cycle number and
    /// everything collected so far. A stop request ends the current cycle
    /// early or cuts the pause short; results gathered up to that point are
    /// returned.
    pub async fn crawl_loop<F>(
        &self,
        seeds: &[String],
        interval: Duration,
        mut on_cycle: F,
    ) -> ResultStore
    where
        F: FnMut(u32, &ResultStore),
    {
        self.stop.reset();
        let mut results = ResultStore::new();
        let mut cycle = 0u32;

        loop {
            cycle += 1;
            tracing::info!("Loop cycle #{}: {} seed(s)", cycle, seeds.len());

            let cycle_started = Instant::now();
            let (batch, stopped) = self.crawl_batch(seeds).await;
            tracing::info!(
                "Cycle #{} collected {} pages in {:?}",
                cycle,
                batch.len(),
                cycle_started.elapsed()
            );
            results.append(batch);

            if stopped || self.stop.is_stopped() {
                tracing::info!("Loop stopped during cycle #{}", cycle);
                break;
            }

            on_cycle(cycle, &results);

            tracing::info!("Next cycle in {:?}", interval);
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.stop.stopped() => {
                    tracing::info!("Loop stopped while waiting for cycle #{}", cycle + 1);
                    break;
                }
            }
        }

        results
    }

    /// Runs one session per seed; the flag reports whether a stop ended
    /// the batch early
    async fn crawl_batch(&self, seeds: &[String]) -> (ResultStore, bool) {
        let mut results = ResultStore::new();

        for seed in seeds {
            let mut session = self.session(seed);
            let state = self.run(&mut session).await;
            results.append(session.into_results());

            if state == CrawlState::Stopped {
                tracing::info!("Crawl stopped, skipping remaining seeds");
                return (results, true);
            }
        }

        (results, false)
    }

    /// Runs `session` until its frontier empties, its limit is reached, a
    /// stop is requested, or it fails to start
    pub async fn run(&self, session: &mut CrawlSession) -> CrawlState {
        let started = Instant::now();

        let seed = match session.begin() {
            Ok(seed) => seed.clone(),
            Err(e) => {
                tracing::error!("Cannot start crawl of {}: {}", session.seed(), e);
                self.finish(session, started);
                return session.state();
            }
        };

        tracing::info!(
            "Starting crawl of {} (max {} pages, {:.1}s delay)",
            seed,
            session.max_pages(),
            session.delay().as_secs_f64()
        );
        self.emit(CrawlEvent::Started {
            seed: seed.to_string(),
            max_pages: session.max_pages(),
        });

        let (robots, delay) = self.politeness(&seed, session.delay()).await;
        let mut tally = Tally::default();
        let mut fetched_any = false;
        let mut stopped = false;

        loop {
            if session.limit_reached() {
                tracing::info!("Reached page limit of {}", session.max_pages());
                break;
            }

            let Some(url) = session.next_url() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if self.stop.is_stopped() {
                stopped = true;
                break;
            }

            if let Some(policy) = &robots {
                if !policy.permits(url.as_str()) {
                    tracing::info!("URL {} disallowed by robots.txt", url);
                    let record = PageRecord::failed(url.as_str(), ROBOTS_DISALLOWED);
                    self.store(session, &url, record, Vec::new(), &mut tally, started);
                    continue;
                }
            }

            if fetched_any {
                tokio::time::sleep(delay).await;
                if self.stop.is_stopped() {
                    stopped = true;
                    break;
                }
            }
            fetched_any = true;

            let (record, links) = self.process_url(&url).await;
            self.store(session, &url, record, links, &mut tally, started);
        }

        let outcome = if stopped {
            tracing::info!("Stop requested, ending crawl of {}", seed);
            CrawlState::Stopped
        } else {
            CrawlState::Completed
        };
        if let Err(e) = session.transition(outcome) {
            tracing::error!("{}", e);
        }

        tracing::info!(
            "Crawl {}: {} pages ({} ok, {} failed) in {:?}",
            session.state(),
            session.visited_count(),
            tally.succeeded,
            tally.failed,
            started.elapsed()
        );
        self.finish(session, started);
        session.state()
    }

    /// Fetches and extracts one URL
    ///
    /// Returns the record plus the internal links to consider for the
    /// frontier. A failed fetch yields a failure record and no links.
    async fn process_url(&self, url: &Url) -> (PageRecord, Vec<String>) {
        tracing::debug!("Processing URL: {}", url);

        match self.fetcher.fetch(url).await {
            Ok(html) => {
                let extraction = extract_with_diagnostics(&html, url);
                let skipped = extraction.skipped_json_ld();
                if skipped > 0 {
                    tracing::info!("Skipped {} JSON-LD block(s) on {}", skipped, url);
                }
                let markup = extraction.markup_errors();
                if markup > 0 {
                    tracing::debug!("{} markup error(s) tolerated on {}", markup, url);
                }

                let record = extraction.record;
                let links = record.links.internal.iter().cloned().collect();
                (record, links)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}", e);
                (PageRecord::failed(url.as_str(), e.reason.to_string()), Vec::new())
            }
        }
    }

    fn store(
        &self,
        session: &mut CrawlSession,
        url: &Url,
        record: PageRecord,
        links: Vec<String>,
        tally: &mut Tally,
        started: Instant,
    ) {
        tally.add(&record);
        session.record(url, record);

        let queued = links.iter().filter(|link| session.enqueue(link)).count();
        if queued > 0 {
            tracing::debug!("Queued {} new URL(s) from {}", queued, url);
        }

        tracing::info!(
            "Crawled [{}/{}]: {}",
            session.visited_count(),
            session.max_pages(),
            url
        );

        self.emit(CrawlEvent::PageProcessed(Progress {
            url: url.to_string(),
            pages_done: session.visited_count(),
            max_pages: session.max_pages(),
            succeeded: tally.succeeded,
            failed: tally.failed,
            tables_found: tally.tables,
            links_found: tally.links,
            elapsed: started.elapsed(),
        }));
    }

    /// Loads robots.txt when enabled and works out the effective delay
    async fn politeness(&self, seed: &Url, delay: Duration) -> (Option<RobotsPolicy>, Duration) {
        if !self.config.respect_robots {
            return (None, delay);
        }

        let policy =
            fetch_robots(self.fetcher.client(), seed, self.fetcher.user_agent()).await;

        let delay = match policy.crawl_delay() {
            Some(secs) if secs > delay.as_secs_f64() => {
                let secs = secs.min(MAX_DELAY_SECONDS);
                tracing::info!("Using robots.txt crawl-delay of {:.1}s", secs);
                Duration::from_secs_f64(secs)
            }
            _ => delay,
        };

        (Some(policy), delay)
    }

    fn finish(&self, session: &CrawlSession, started: Instant) {
        self.emit(CrawlEvent::Finished {
            seed: session.seed().to_string(),
            state: session.state(),
            pages: session.visited_count(),
            elapsed: started.elapsed(),
        });
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> CrawlEngine {
        CrawlEngine::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_seed_fails_without_requests() {
        let mut engine = engine();
        let mut rx = engine.subscribe();

        let session = engine.start("http://", 5, 0.1).await;
        assert_eq!(session.state(), CrawlState::Failed);
        assert!(session.results().is_empty());

        match rx.recv().await {
            Some(CrawlEvent::Finished { state, pages, .. }) => {
                assert_eq!(state, CrawlState::Failed);
                assert_eq!(pages, 0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_uses_configured_limits() {
        let engine = engine();
        let session = engine.session("https://example.com/");
        assert_eq!(session.max_pages(), 50);
        assert_eq!(session.delay(), Duration::from_millis(500));
        assert_eq!(session.state(), CrawlState::Idle);
    }

    #[tokio::test]
    async fn test_session_cannot_run_twice() {
        let engine = engine();
        let mut session = CrawlSession::new("ftp://example.com/", 5, 0.1);
        assert_eq!(engine.run(&mut session).await, CrawlState::Failed);
        assert_eq!(engine.run(&mut session).await, CrawlState::Failed);
    }

    #[test]
    fn test_tally_counts() {
        let mut tally = Tally::default();
        tally.add(&PageRecord::new("https://example.com/"));
        tally.add(&PageRecord::failed("https://example.com/x", "HTTP 404"));
        assert_eq!(tally.succeeded, 1);
        assert_eq!(tally.failed, 1);
    }
}
