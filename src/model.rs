//! Extraction records
//!
//! A [`PageRecord`] is produced once per visited URL and never modified
//! afterwards. Field names here are the field names of the JSON export:
//!
//! ```text
//! { url, status, fetched_at,
//!   metadata: {...},
//!   tables: [{rows, cols, caption?, data}],
//!   text: {paragraphs, word_count},
//!   links: {internal: [...], external: [...]},
//!   headings: [{level, text}],
//!   lists: [{ordered, items}],
//!   forms: [{action, method, fields: [{name, type, required}]}],
//!   structured_data: [...] }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of fetching a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Failed { reason: String },
}

impl FetchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Short label used in flat exports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

/// The structured extraction result for one fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub status: FetchStatus,
    pub fetched_at: DateTime<Utc>,
    /// `title`, `description`, `keywords` and `og:*` keys; absent keys are omitted
    pub metadata: BTreeMap<String, String>,
    pub tables: Vec<TableRecord>,
    pub text: TextContent,
    pub links: LinkSets,
    pub headings: Vec<Heading>,
    pub lists: Vec<ListRecord>,
    pub forms: Vec<FormRecord>,
    /// Raw JSON-LD blocks, kept opaque
    pub structured_data: Vec<serde_json::Value>,
}

impl PageRecord {
    /// Builds an empty successful record for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: FetchStatus::Success,
            fetched_at: Utc::now(),
            metadata: BTreeMap::new(),
            tables: Vec::new(),
            text: TextContent::default(),
            links: LinkSets::default(),
            headings: Vec::new(),
            lists: Vec::new(),
            forms: Vec::new(),
            structured_data: Vec::new(),
        }
    }

    /// Builds a failure-only record: status and URL, every collection empty
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Failed {
                reason: reason.into(),
            },
            ..Self::new(url)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.get("description").map(String::as_str)
    }
}

/// One `<table>` normalized to a rectangle
///
/// Every row in `data` holds exactly `cols` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub rows: usize,
    pub cols: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub data: Vec<Vec<String>>,
}

/// Paragraph text and the aggregate word count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub paragraphs: Vec<String>,
    pub word_count: usize,
}

/// Links split by whether they stay on the page's site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSets {
    pub internal: BTreeSet<String>,
    pub external: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub ordered: bool,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub action: Option<String>,
    pub method: String,
    pub fields: Vec<FieldDescriptor>,
}

/// One `<input>`, `<select>` or `<textarea>` inside a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub input_type: String,
    pub required: bool,
}
