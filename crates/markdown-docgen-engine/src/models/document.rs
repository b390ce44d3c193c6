use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::content::ContentBlock;

/// Aggregate counters computed when a section is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMetadata {
    pub word_count: usize,
    pub code_blocks_count: usize,
    pub diagrams_count: usize,
    pub tasks_count: usize,
    pub has_table: bool,
    pub has_blockquotes: bool,
    pub has_diagrams: bool,
    pub has_tasks: bool,
}

/// A heading-delimited, independently addressable region of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable slug. Overwritten once by cross-locale reconciliation.
    pub id: String,
    /// Raw heading text, decorative symbols included.
    pub title: String,
    pub level: u8,
    pub content: Vec<ContentBlock>,
    pub metadata: SectionMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// RFC 3339 timestamp of the source file's modification time.
    pub last_modified: String,
    pub word_count: usize,
    /// Minutes, rounded up.
    pub reading_time: usize,
    pub sections_count: usize,
    pub code_blocks_count: usize,
}

/// One markdown file of one locale, parsed into sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub front_matter: BTreeMap<String, Value>,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }
}

/// Documents of one locale, keyed by document key (the file stem).
pub type LocaleDocs = BTreeMap<String, Document>;

/// Every parsed document, keyed by locale then document key.
pub type DocsData = BTreeMap<String, LocaleDocs>;

/// Document key to positional section index to canonical slug.
pub type SectionIdMapping = BTreeMap<String, BTreeMap<usize, String>>;
