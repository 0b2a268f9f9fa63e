use super::{selector, Diagnostic};
use scraper::Html;

/// Extracts `<script type="application/ld+json">` bodies as raw JSON values
///
/// A body that is empty or fails to parse is skipped and reported as a
/// diagnostic; the remaining blocks are still returned.
pub(super) fn extract_json_ld(
    document: &Html,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<serde_json::Value> {
    let Some(script_selector) = selector("script") else {
        return Vec::new();
    };

    let mut values = Vec::new();

    let scripts = document.select(&script_selector).filter(|script| {
        script
            .value()
            .attr("type")
            .map_or(false, |t| t.trim().eq_ignore_ascii_case("application/ld+json"))
    });

    for (index, script) in scripts.enumerate() {
        let body = script.text().collect::<String>();
        if body.trim().is_empty() {
            tracing::debug!("Skipping empty JSON-LD block {}", index);
            diagnostics.push(Diagnostic::EmptyJsonLd { index });
            continue;
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) => values.push(value),
            Err(e) => {
                tracing::debug!("Skipping invalid JSON-LD block {}: {}", index, e);
                diagnostics.push(Diagnostic::InvalidJsonLd {
                    index,
                    message: e.to_string(),
                });
            }
        }
    }

    values
}
