//! In-memory result store and crawl statistics
//!
//! The store is an append-only, ordered list of [`PageRecord`]s. It is owned
//! by a single crawl session while the crawl runs and handed to the exporters
//! afterwards.

use crate::model::PageRecord;
use std::collections::HashMap;

/// Ordered collection of page records from one or more crawl sessions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    pages: Vec<PageRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: PageRecord) {
        self.pages.push(record);
    }

    /// Moves every record of `other` to the end of this store
    pub fn append(&mut self, mut other: ResultStore) {
        self.pages.append(&mut other.pages);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.pages.iter()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Computes aggregate counts over all records
    pub fn statistics(&self) -> CrawlStatistics {
        let mut stats = CrawlStatistics {
            pages: self.pages.len(),
            ..CrawlStatistics::default()
        };

        for page in &self.pages {
            match page.status.reason() {
                None => stats.succeeded += 1,
                Some(reason) => {
                    stats.failed += 1;
                    *stats
                        .failure_reasons
                        .entry(reason.to_string())
                        .or_insert(0) += 1;
                }
            }
            stats.tables += page.tables.len();
            stats.internal_links += page.links.internal.len();
            stats.external_links += page.links.external.len();
            stats.words += page.text.word_count;
        }

        stats
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl Extend<PageRecord> for ResultStore {
    fn extend<T: IntoIterator<Item = PageRecord>>(&mut self, iter: T) {
        self.pages.extend(iter);
    }
}

impl From<Vec<PageRecord>> for ResultStore {
    fn from(pages: Vec<PageRecord>) -> Self {
        Self { pages }
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of page records
    pub pages: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Tables extracted across all pages
    pub tables: usize,
    pub internal_links: usize,
    pub external_links: usize,
    /// Sum of paragraph word counts
    pub words: usize,
    /// Failure reason and how many pages failed with it
    pub failure_reasons: HashMap<String, usize>,
}

impl CrawlStatistics {
    /// Percentage of pages fetched successfully
    pub fn success_rate(&self) -> f64 {
        if self.pages == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.pages as f64 * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages crawled: {}", stats.pages);
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed);
    println!("  Success rate: {:.1}%", stats.success_rate());
    println!();

    println!("Content:");
    println!("  Tables: {}", stats.tables);
    println!("  Internal links: {}", stats.internal_links);
    println!("  External links: {}", stats.external_links);
    println!("  Words: {}", stats.words);
    println!();

    if !stats.failure_reasons.is_empty() {
        println!("Failure Summary:");
        let mut reasons: Vec<_> = stats.failure_reasons.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (reason, count) in reasons {
            println!("  {}: {}", reason, count);
        }
        println!();
    }
}
