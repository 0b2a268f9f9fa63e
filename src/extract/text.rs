use super::{element_text, selector};
use crate::model::{Heading, TextContent};
use scraper::Html;

/// Extracts non-empty `<p>` paragraphs and their combined word count
///
/// Words are whitespace-delimited tokens.
pub(super) fn extract_text(document: &Html) -> TextContent {
    let Some(p_selector) = selector("p") else {
        return TextContent::default();
    };

    let paragraphs: Vec<String> = document
        .select(&p_selector)
        .map(|p| element_text(&p))
        .filter(|text| !text.is_empty())
        .collect();

    let word_count = paragraphs
        .iter()
        .map(|p| p.split_whitespace().count())
        .sum();

    TextContent {
        paragraphs,
        word_count,
    }
}

/// Extracts `<h1>`..`<h6>` headings in document order
pub(super) fn extract_headings(document: &Html) -> Vec<Heading> {
    let Some(heading_selector) = selector("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    document
        .select(&heading_selector)
        .filter_map(|h| {
            let level = h.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            let text = element_text(&h);
            (!text.is_empty()).then_some(Heading { level, text })
        })
        .collect()
}
