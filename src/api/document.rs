//! Purpose: Define the tagged document union carried across the API boundary.
//! Exports: `Document`, `Format`, `GroupedContent`, `ConversionRequest`.
//! Role: Wire-level contract shared by the HTTP server, CLI, and library users.
//! Invariants: Serde field names match the published API payloads (camelCase).
//! Invariants: `Format` discriminators are exactly `text`, `json`, `xml`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Grouped JSON content: segment name to array of numbered-field objects.
/// `serde_json`'s `preserve_order` feature keeps key insertion order, which
/// the reconstruction path relies on.
pub type GroupedContent = Map<String, Value>;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Json,
    Xml,
}

/// A document tagged with its format. The text variant carries the separators
/// that were (or will be) used to split its content.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum Document {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        segment_separator: String,
        element_separator: String,
    },
    Json {
        content: GroupedContent,
    },
    Xml {
        content: String,
    },
}

impl Document {
    pub fn format(&self) -> Format {
        match self {
            Document::Text { .. } => Format::Text,
            Document::Json { .. } => Format::Json,
            Document::Xml { .. } => Format::Xml,
        }
    }
}

/// A generic conversion request: source document, target format, and the
/// separators required when the target is the text format.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub document: Document,
    pub target_format: Format,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_separator: Option<String>,
}
