use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::models::{DocsData, Document, DocumentMetadata, Section, SectionMetadata};
use crate::parsing::slug::section_slug;

/// Create a temporary docs directory
pub fn create_test_docs_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file, creating parent directories as needed
pub fn create_test_file(docs_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = docs_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}

/// A document with one empty section per title, ids derived locally.
pub fn document_with_titles(titles: &[&str]) -> Document {
    let sections: Vec<Section> = titles
        .iter()
        .enumerate()
        .map(|(index, title)| Section {
            id: section_slug(title, index),
            title: title.to_string(),
            level: 2,
            content: Vec::new(),
            metadata: SectionMetadata::default(),
        })
        .collect();

    Document {
        title: titles.first().unwrap_or(&"Untitled").to_string(),
        description: None,
        metadata: DocumentMetadata {
            last_modified: "2024-01-01T00:00:00.000Z".to_string(),
            word_count: 0,
            reading_time: 0,
            sections_count: sections.len(),
            code_blocks_count: 0,
        },
        sections,
        features: Vec::new(),
        front_matter: Default::default(),
    }
}

/// Build docs data from `(locale, doc key, section titles)` triples.
pub fn docs_data(entries: &[(&str, &str, &[&str])]) -> DocsData {
    let mut data = DocsData::new();
    for (locale, key, titles) in entries {
        data.entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), document_with_titles(titles));
    }
    data
}
