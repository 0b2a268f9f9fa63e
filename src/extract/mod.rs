//! HTML extraction for Page Harvester
//!
//! This module turns one page's HTML into a [`PageRecord`]:
//! - Metadata (title, description, keywords, Open Graph)
//! - Tables, normalized to rectangles
//! - Paragraph text with a word count, and headings
//! - Internal and external link sets
//! - Lists, forms and JSON-LD blocks
//!
//! Extraction never fails. Malformed markup is repaired by the parser and
//! unusable fragments are dropped; both are reported as [`Diagnostic`]s.

mod forms;
mod links;
mod lists;
mod metadata;
mod structured;
mod tables;
mod text;

pub use tables::{MAX_COLSPAN, MAX_COLUMNS};

use crate::model::PageRecord;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A non-fatal problem noticed while extracting a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The HTML parser recovered from a markup error
    Markup(String),

    /// A `<script type="application/ld+json">` body was not valid JSON
    InvalidJsonLd { index: usize, message: String },

    /// A `<script type="application/ld+json">` body was empty
    EmptyJsonLd { index: usize },
}

impl Diagnostic {
    /// Returns true if this diagnostic means a JSON-LD block was skipped
    pub fn is_skipped_json_ld(&self) -> bool {
        matches!(self, Self::InvalidJsonLd { .. } | Self::EmptyJsonLd { .. })
    }
}

/// A best-effort extraction plus everything that was repaired or skipped
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: PageRecord,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    /// Number of JSON-LD blocks that were dropped
    pub fn skipped_json_ld(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.is_skipped_json_ld())
            .count()
    }

    /// Number of markup errors the parser recovered from
    pub fn markup_errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::Markup(_)))
            .count()
    }
}

/// Extracts a page record from HTML
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The page URL, used to resolve relative links and to decide
///   which links are internal
///
/// # Example
///
/// ```
/// use page_harvester::extract::extract;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello world</p></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let record = extract(html, &base_url);
/// assert_eq!(record.title(), Some("Test"));
/// assert_eq!(record.text.word_count, 2);
/// ```
pub fn extract(html: &str, base_url: &Url) -> PageRecord {
    extract_with_diagnostics(html, base_url).record
}

/// Extracts a page record and reports what had to be repaired or skipped
pub fn extract_with_diagnostics(html: &str, base_url: &Url) -> Extraction {
    let document = Html::parse_document(html);

    let mut diagnostics: Vec<Diagnostic> = document
        .errors
        .iter()
        .map(|e| Diagnostic::Markup(e.to_string()))
        .collect();

    let mut record = PageRecord::new(base_url.as_str());
    record.metadata = metadata::extract_metadata(&document);
    record.tables = tables::extract_tables(&document);
    record.text = text::extract_text(&document);
    record.headings = text::extract_headings(&document);
    record.links = links::extract_links(&document, base_url);
    record.lists = lists::extract_lists(&document);
    record.forms = forms::extract_forms(&document, base_url);
    record.structured_data = structured::extract_json_ld(&document, &mut diagnostics);

    Extraction {
        record,
        diagnostics,
    }
}

/// Parses a static CSS selector
///
/// All selectors in this module are literals; a parse failure yields no
/// matches rather than a panic.
fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Collapses an element's text into single-spaced, trimmed form
fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
