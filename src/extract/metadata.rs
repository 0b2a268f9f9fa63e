use super::{collapse_whitespace, element_text, selector};
use scraper::Html;
use std::collections::BTreeMap;

/// Extracts page metadata
///
/// Keys produced:
/// - `title` from the first non-empty `<title>`
/// - `description` and `keywords` from `<meta name=...>`
/// - `og:*` from `<meta property="og:...">`
///
/// Keys whose tag is absent or empty are omitted. The first occurrence of a
/// key wins.
pub(super) fn extract_metadata(document: &Html) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    if let Some(title) = extract_title(document) {
        metadata.insert("title".to_string(), title);
    }

    let Some(meta_selector) = selector("meta") else {
        return metadata;
    };

    for element in document.select(&meta_selector) {
        let attrs = element.value();
        let Some(content) = attrs.attr("content").map(collapse_whitespace) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }

        let name = attrs.attr("name").unwrap_or("").trim().to_lowercase();
        let property = attrs.attr("property").unwrap_or("").trim().to_lowercase();

        let key = if name == "description" || name == "keywords" {
            name
        } else if property.starts_with("og:") && property.len() > 3 {
            property
        } else {
            continue;
        };

        metadata.entry(key).or_insert(content);
    }

    metadata
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = selector("title")?;

    document
        .select(&title_selector)
        .map(|element| element_text(&element))
        .find(|s| !s.is_empty())
}
