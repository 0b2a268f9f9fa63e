use super::selector;
use crate::model::{FieldDescriptor, FormRecord};
use scraper::{ElementRef, Html};
use url::Url;

/// Extracts every `<form>` with its `<input>`, `<select>` and `<textarea>` fields
///
/// - `action` is resolved against `base_url` when it parses, kept verbatim
///   otherwise, and absent when the attribute is missing or blank
/// - `method` is upper-cased and defaults to `GET`
/// - An input's type defaults to `text`; selects and textareas use their tag name
pub(super) fn extract_forms(document: &Html, base_url: &Url) -> Vec<FormRecord> {
    let (Some(form_selector), Some(field_selector)) =
        (selector("form"), selector("input, select, textarea"))
    else {
        return Vec::new();
    };

    document
        .select(&form_selector)
        .map(|form| {
            let attrs = form.value();
            let action = attrs
                .attr("action")
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(|a| {
                    base_url
                        .join(a)
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| a.to_string())
                });
            let method = attrs
                .attr("method")
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or("get")
                .to_uppercase();

            FormRecord {
                action,
                method,
                fields: form.select(&field_selector).map(|f| describe_field(&f)).collect(),
            }
        })
        .collect()
}

fn describe_field(field: &ElementRef) -> FieldDescriptor {
    let attrs = field.value();
    let tag = attrs.name();

    let input_type = if tag == "input" {
        attrs
            .attr("type")
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string())
    } else {
        tag.to_string()
    };

    FieldDescriptor {
        name: attrs
            .attr("name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        input_type,
        required: attrs.attr("required").is_some(),
    }
}
