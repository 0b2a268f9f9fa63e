use super::{collapse_whitespace, selector};
use crate::model::ListRecord;
use scraper::{ElementRef, Html, Node};

/// Extracts every `<ul>` and `<ol>` as a [`ListRecord`]
///
/// Items are the direct `<li>` children. A list nested inside an item is
/// flattened into the parent: the item's own text comes first, then the
/// nested list's items, depth-first. The nested list still produces its own
/// record as well. Items with no text are dropped.
pub(super) fn extract_lists(document: &Html) -> Vec<ListRecord> {
    let Some(list_selector) = selector("ul, ol") else {
        return Vec::new();
    };

    document
        .select(&list_selector)
        .map(|list| {
            let mut items = Vec::new();
            flatten_items(list, &mut items);
            ListRecord {
                ordered: list.value().name() == "ol",
                items,
            }
        })
        .collect()
}

fn is_list(element: &ElementRef) -> bool {
    matches!(element.value().name(), "ul" | "ol")
}

fn flatten_items(list: ElementRef, items: &mut Vec<String>) {
    for li in list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
    {
        let mut own_text = String::new();
        let mut nested = Vec::new();
        collect_item(li, &mut own_text, &mut nested);

        let text = collapse_whitespace(&own_text);
        if !text.is_empty() {
            items.push(text);
        }
        for sublist in nested {
            flatten_items(sublist, items);
        }
    }
}

/// Gathers an item's text while setting nested lists aside
fn collect_item<'a>(element: ElementRef<'a>, text: &mut String, nested: &mut Vec<ElementRef<'a>>) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => {
                text.push_str(t);
                text.push(' ');
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    if is_list(&child_element) {
                        nested.push(child_element);
                    } else {
                        collect_item(child_element, text, nested);
                    }
                }
            }
            _ => {}
        }
    }
}
