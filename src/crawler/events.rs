//! Progress events and cooperative stop
//!
//! Events flow one way, from the crawl loop to whoever subscribed, over an
//! unbounded channel so that sending never waits on the receiver. Commands
//! flow the other way through [`StopHandle`] and the engine's methods.

use crate::crawler::CrawlState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Running counts after one crawl iteration
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// URL processed in this iteration
    pub url: String,
    pub pages_done: usize,
    pub max_pages: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub tables_found: usize,
    pub links_found: usize,
    pub elapsed: Duration,
}

impl Progress {
    /// Share of the page limit consumed, 0.0..=100.0
    pub fn percentage(&self) -> f64 {
        if self.max_pages == 0 {
            return 0.0;
        }
        (self.pages_done as f64 / self.max_pages as f64 * 100.0).min(100.0)
    }
}

/// Advisory notifications emitted by the crawl engine
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    Started {
        seed: String,
        max_pages: usize,
    },
    PageProcessed(Progress),
    Finished {
        seed: String,
        state: CrawlState,
        pages: usize,
        elapsed: Duration,
    },
}

/// Requests a cooperative stop of a running crawl
///
/// The flag is checked between fetches; an in-flight request always
/// completes. Tasks parked in [`StopHandle::stopped`] wake immediately.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    inner: Arc<StopSignal>,
}

#[derive(Debug, Default)]
struct StopSignal {
    flag: AtomicBool,
    notify: Notify,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Clears a previous stop request so a new crawl can run
    pub fn reset(&self) {
        self.inner.flag.store(false, Ordering::SeqCst);
    }

    /// Resolves once a stop has been requested
    pub async fn stopped(&self) {
        loop {
            // Registered before the check so a concurrent stop is not missed
            let notified = self.inner.notify.notified();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}
