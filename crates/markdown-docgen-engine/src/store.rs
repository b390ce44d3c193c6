//! # Document Store
//!
//! Read-only lookups over generated docs data, resolved against one active
//! locale. Every lookup fails soft: a miss is logged as a warning and yields
//! `None` or an empty collection.

use serde::{Deserialize, Serialize};

use crate::models::{
    BlockType, Blockquote, CalloutKind, ContentBlock, DocsData, Document, ListItem, LocaleDocs,
    Section,
};

/// Characters of context kept on each side of a search match.
pub const SEARCH_CONTEXT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub level: u8,
    pub word_count: usize,
    pub has_code: bool,
    pub has_table: bool,
    pub has_blockquotes: bool,
}

/// One matching block inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMatch {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// The full searchable text of the block.
    pub content: String,
    /// The first match with up to [`SEARCH_CONTEXT_CHARS`] on either side.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMatches {
    pub section_id: String,
    pub section_title: String,
    pub matches: Vec<BlockMatch>,
}

/// Immutable lookup interface over generated documentation.
#[derive(Debug, Clone)]
pub struct DocStore {
    data: DocsData,
    master_locale: String,
    active_locale: Option<String>,
}

impl DocStore {
    /// Create a store whose active locale is the master locale (or the first
    /// available one when the master is absent).
    pub fn new(data: DocsData, master_locale: impl Into<String>) -> Self {
        let master_locale = master_locale.into();
        let active_locale = resolve_locale(&data, &master_locale, &master_locale);
        Self {
            data,
            master_locale,
            active_locale,
        }
    }

    /// Switch the requested locale, falling back to the master locale and then
    /// to the first available one.
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.active_locale = resolve_locale(&self.data, locale, &self.master_locale);
        self
    }

    /// Load a store from `structured-docs.json` content.
    pub fn from_json(json: &str, master_locale: &str) -> Result<Self, serde_json::Error> {
        let data: DocsData = serde_json::from_str(json)?;
        Ok(Self::new(data, master_locale))
    }

    pub fn data(&self) -> &DocsData {
        &self.data
    }

    /// The locale lookups resolve against; `None` when the store is empty.
    pub fn active_locale(&self) -> Option<&str> {
        self.active_locale.as_deref()
    }

    pub fn locales(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    /// Document keys of the active locale.
    pub fn document_keys(&self) -> Vec<&str> {
        self.active_docs()
            .map(|docs| docs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_document_available(&self, key: &str) -> bool {
        self.active_docs().is_some_and(|docs| docs.contains_key(key))
    }

    /// Look up a document. `locale` overrides the active locale, with the
    /// same fallback chain.
    pub fn get_document(&self, key: &str, locale: Option<&str>) -> Option<&Document> {
        let locale = match locale {
            Some(requested) => resolve_locale(&self.data, requested, &self.master_locale),
            None => self.active_locale.clone(),
        };
        let Some(locale) = locale else {
            log::warn!("No documentation available for any locale");
            return None;
        };

        let doc = self.data.get(&locale).and_then(|docs| docs.get(key));
        if doc.is_none() {
            log::warn!("Document '{key}' not found for locale '{locale}'");
        }
        doc
    }

    pub fn get_section(&self, key: &str, section_id: &str) -> Option<&Section> {
        let doc = self.get_document(key, None)?;
        let section = doc.section(section_id);
        if section.is_none() {
            log::warn!("Section '{section_id}' not found in document '{key}'");
        }
        section
    }

    pub fn is_section_available(&self, key: &str, section_id: &str) -> bool {
        self.active_docs()
            .and_then(|docs| docs.get(key))
            .is_some_and(|doc| doc.section(section_id).is_some())
    }

    /// Section ids of a document in order.
    pub fn section_ids(&self, key: &str) -> Vec<&str> {
        self.get_document(key, None)
            .map(Document::section_ids)
            .unwrap_or_default()
    }

    /// Blocks of one type in a section, in document order.
    pub fn get_content_blocks_of_type(
        &self,
        key: &str,
        section_id: &str,
        block_type: BlockType,
    ) -> Vec<&ContentBlock> {
        self.get_section(key, section_id)
            .map(|section| {
                section
                    .content
                    .iter()
                    .filter(|block| block.block_type() == block_type)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Blockquotes of a section carrying the given callout kind.
    pub fn get_blockquotes_by_kind(
        &self,
        key: &str,
        section_id: &str,
        kind: CalloutKind,
    ) -> Vec<&Blockquote> {
        self.get_content_blocks_of_type(key, section_id, BlockType::Blockquote)
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Blockquote(quote) if quote.kind == Some(kind) => Some(quote),
                _ => None,
            })
            .collect()
    }

    pub fn list_table_of_contents(&self, key: &str) -> Vec<TocEntry> {
        let Some(doc) = self.get_document(key, None) else {
            return Vec::new();
        };

        doc.sections
            .iter()
            .map(|section| TocEntry {
                id: section.id.clone(),
                title: section.title.clone(),
                level: section.level,
                word_count: section.metadata.word_count,
                has_code: section.metadata.code_blocks_count > 0,
                has_table: section.metadata.has_table,
                has_blockquotes: section.metadata.has_blockquotes,
            })
            .collect()
    }

    /// Case-insensitive substring search over the searchable text of every
    /// block, grouped by section. Sections without matches are omitted.
    pub fn search_within_document(&self, key: &str, query: &str) -> Vec<SectionMatches> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let Some(doc) = self.get_document(key, None) else {
            return Vec::new();
        };
        let needle = lowercase(query);

        doc.sections
            .iter()
            .filter_map(|section| {
                let matches: Vec<BlockMatch> = section
                    .content
                    .iter()
                    .filter_map(|block| {
                        let content = searchable_text(block)?;
                        let context = match_context(&content, &needle)?;
                        Some(BlockMatch {
                            block_type: block.block_type(),
                            content,
                            context,
                        })
                    })
                    .collect();

                (!matches.is_empty()).then(|| SectionMatches {
                    section_id: section.id.clone(),
                    section_title: section.title.clone(),
                    matches,
                })
            })
            .collect()
    }

    fn active_docs(&self) -> Option<&LocaleDocs> {
        self.active_locale
            .as_deref()
            .and_then(|locale| self.data.get(locale))
    }
}

fn resolve_locale(data: &DocsData, requested: &str, master: &str) -> Option<String> {
    if data.contains_key(requested) {
        return Some(requested.to_string());
    }
    if data.contains_key(master) {
        log::warn!("Documentation for locale '{requested}' not found, using '{master}' as fallback");
        return Some(master.to_string());
    }
    let first = data.keys().next()?;
    log::warn!("Documentation for locale '{requested}' not found, using '{first}' as fallback");
    Some(first.clone())
}

/// The text a block is searched by; `None` for blocks that are not searched.
fn searchable_text(block: &ContentBlock) -> Option<String> {
    match block {
        ContentBlock::Paragraph(p) => Some(p.text.clone()),
        ContentBlock::Heading(h) => Some(h.text.clone()),
        ContentBlock::Code(code) => Some(code.code.clone()),
        ContentBlock::List(items) => {
            let mut parts = Vec::new();
            collect_list_text(items, &mut parts);
            Some(parts.join(" "))
        }
        ContentBlock::TaskList(tasks) => Some(
            tasks
                .iter()
                .map(|task| task.content.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        ),
        ContentBlock::Table(table) => Some(
            table
                .rows
                .iter()
                .map(|row| row.cells.join(" "))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        ContentBlock::Diagram(_)
        | ContentBlock::Blockquote(_)
        | ContentBlock::Divider
        | ContentBlock::LineBreak
        | ContentBlock::RawMarkup(_) => None,
    }
}

fn collect_list_text(items: &[ListItem], parts: &mut Vec<String>) {
    for item in items {
        for block in &item.content {
            if let Some(text) = searchable_text(block) {
                parts.push(text);
            }
        }
        if let Some(children) = &item.children {
            collect_list_text(children, parts);
        }
    }
}

/// Per-character lowercasing. Unlike `str::to_lowercase` it ignores word
/// position (final sigma), so query and content always fold the same way.
fn lowercase(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// The first case-insensitive occurrence of `needle` (already folded with
/// [`lowercase`]) with surrounding context, sliced by characters of `content`.
fn match_context(content: &str, needle: &str) -> Option<String> {
    // Lowercasing may expand a character, so map lowered chars back to the
    // source char index.
    let mut lowered = String::with_capacity(content.len());
    let mut origin = Vec::with_capacity(content.len());
    for (index, ch) in content.chars().enumerate() {
        for lower in ch.to_lowercase() {
            lowered.push(lower);
            origin.push(index);
        }
    }

    let byte_start = lowered.find(needle)?;
    let lowered_start = lowered[..byte_start].chars().count();
    let lowered_end = lowered_start + needle.chars().count();

    let start = origin[lowered_start];
    let end = origin[lowered_end - 1] + 1;

    let context_start = start.saturating_sub(SEARCH_CONTEXT_CHARS);
    let context_end = end + SEARCH_CONTEXT_CHARS;
    Some(
        content
            .chars()
            .skip(context_start)
            .take(context_end - context_start)
            .collect(),
    )
}
