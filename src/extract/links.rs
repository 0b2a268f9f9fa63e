use super::selector;
use crate::model::LinkSets;
use crate::url::{resolve_link, same_site};
use scraper::Html;
use url::Url;

/// Extracts and classifies every `<a href>` on the page
///
/// Each href is resolved against `base_url` and its fragment removed. A link
/// is internal when it is on the same site as `base_url`, external otherwise.
/// Duplicates collapse because both sides are sets.
///
/// **Skipped:** `javascript:`, `mailto:`, `tel:`, `data:`, fragment-only and
/// unresolvable hrefs.
pub(super) fn extract_links(document: &Html, base_url: &Url) -> LinkSets {
    let mut links = LinkSets::default();

    let Some(a_selector) = selector("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(absolute) = resolve_link(href, base_url) else {
            continue;
        };

        if same_site(&absolute, base_url) {
            links.internal.insert(absolute.to_string());
        } else {
            links.external.insert(absolute.to_string());
        }
    }

    links
}
