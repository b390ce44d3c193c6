//! # Generation
//!
//! Drives the whole pipeline for a docs tree laid out as
//! `<docs_dir>/<locale>/**/*.md`:
//!
//! 1. every configured locale directory is scanned and each file parsed
//! 2. section ids are reconciled against the master locale
//! 3. consistency across locales is checked (fatal only in strict mode)
//! 4. `structured-docs.json`, `section-mapping.json` and `docs.ts` are written

pub mod types_descriptor;

use chrono::{DateTime, SecondsFormat, Utc};
use relative_path::RelativePath;
use std::path::{Path, PathBuf};

use crate::io::{self, IoError};
use crate::models::{DocsData, Document, DocumentMetadata, LocaleDocs, SectionIdMapping};
use crate::parsing::{front_matter::string_value, parse_source};
use crate::reconcile::{self, ConsistencyReport, ReconcileError};

pub use types_descriptor::render_type_descriptor;

pub const STRUCTURED_DOCS_FILE: &str = "structured-docs.json";
pub const SECTION_MAPPING_FILE: &str = "section-mapping.json";
pub const TYPES_FILE: &str = "docs.ts";

pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Master locale '{0}' not found; it is required for consistent section IDs")]
    MasterLocaleMissing(String),
    #[error("Sections are inconsistent across locales ({0} warnings)")]
    Inconsistent(usize),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ReconcileError> for GenerateError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::MasterLocaleMissing(locale) => GenerateError::MasterLocaleMissing(locale),
            ReconcileError::Inconsistent(count) => GenerateError::Inconsistent(count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Root holding one directory per locale.
    pub docs_dir: PathBuf,
    /// Output directory for the JSON artifacts.
    pub data_dir: PathBuf,
    /// Output directory for the type descriptor.
    pub types_dir: PathBuf,
    pub locales: Vec<String>,
    pub master_locale: String,
    /// Treat any consistency warning as fatal.
    pub strict: bool,
    pub words_per_minute: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            data_dir: PathBuf::from("src/data"),
            types_dir: PathBuf::from("src/types"),
            locales: vec!["en".to_string(), "ru".to_string()],
            master_locale: "en".to_string(),
            strict: false,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

/// The reconciled result of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub data: DocsData,
    pub mapping: SectionIdMapping,
    pub report: ConsistencyReport,
}

/// Paths of the written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub structured_docs: PathBuf,
    pub section_mapping: PathBuf,
    pub types: PathBuf,
}

pub struct Generator {
    options: GenerateOptions,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Parse every configured locale. Missing locale directories and
    /// unreadable files are skipped with a warning.
    pub fn collect(&self) -> DocsData {
        let mut data = DocsData::new();

        for locale in &self.options.locales {
            let locale_dir = self.options.docs_dir.join(locale);
            if io::validate_docs_dir(&locale_dir).is_err() {
                log::warn!("Directory {} does not exist", locale_dir.display());
                continue;
            }

            log::info!("Processing locale: {locale}");
            data.insert(locale.clone(), self.collect_locale(&locale_dir));
        }

        data
    }

    fn collect_locale(&self, locale_dir: &Path) -> LocaleDocs {
        let mut docs = LocaleDocs::new();

        let files = match io::scan_markdown_files(locale_dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Failed to scan {}: {e}", locale_dir.display());
                return docs;
            }
        };

        for file in files {
            let Some(key) = io::document_key(locale_dir, &file) else {
                log::warn!("Skipping {}: not a valid document path", file.display());
                continue;
            };
            let relative = format!("{key}.md");
            let source = match io::read_file(RelativePath::new(&relative), locale_dir) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("Skipping {}: {e}", file.display());
                    continue;
                }
            };
            let modified = match io::modified_time(&file) {
                Ok(time) => DateTime::<Utc>::from(time),
                Err(e) => {
                    log::warn!("No modification time for {}: {e}", file.display());
                    Utc::now()
                }
            };

            let doc = build_document(&key, &source, modified, self.options.words_per_minute);
            log::info!(
                "  {key}: {} sections, {} code blocks",
                doc.metadata.sections_count,
                doc.metadata.code_blocks_count
            );
            docs.insert(key, doc);
        }

        docs
    }

    /// Collect, reconcile and validate without touching the output directories.
    pub fn build(&self) -> Result<Generated, GenerateError> {
        log::info!("Starting structured documentation generation...");
        log::info!("Master locale: {}", self.options.master_locale);
        log::info!("Processing locales: {}", self.options.locales.join(", "));

        let mut data = self.collect();

        log::info!(
            "Creating master section mapping from '{}' locale...",
            self.options.master_locale
        );
        let mapping = reconcile::reconcile_section_ids(&mut data, &self.options.master_locale)?;

        let report = reconcile::validate_consistency(&data, &mapping, &self.options.locales);
        let report = if self.options.strict {
            report.into_strict()?
        } else {
            report
        };

        Ok(Generated {
            data,
            mapping,
            report,
        })
    }

    /// Write the JSON artifacts and the type descriptor.
    pub fn write_artifacts(
        &self,
        generated: &Generated,
        generated_at: DateTime<Utc>,
    ) -> Result<Artifacts, GenerateError> {
        let data_dir = &self.options.data_dir;
        let types_dir = &self.options.types_dir;

        let structured = serde_json::to_string_pretty(&generated.data)?;
        io::write_file(RelativePath::new(STRUCTURED_DOCS_FILE), data_dir, &structured)?;

        let mapping = serde_json::to_string_pretty(&generated.mapping)?;
        io::write_file(RelativePath::new(SECTION_MAPPING_FILE), data_dir, &mapping)?;

        let types = render_type_descriptor(
            &generated.data,
            &self.options.master_locale,
            &generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        io::write_file(RelativePath::new(TYPES_FILE), types_dir, &types)?;

        Ok(Artifacts {
            structured_docs: data_dir.join(STRUCTURED_DOCS_FILE),
            section_mapping: data_dir.join(SECTION_MAPPING_FILE),
            types: types_dir.join(TYPES_FILE),
        })
    }

    /// Build, write and log a summary.
    pub fn run(&self) -> Result<(Generated, Artifacts), GenerateError> {
        let generated = self.build()?;
        let artifacts = self.write_artifacts(&generated, Utc::now())?;
        log_summary(&generated.data, &artifacts);
        Ok((generated, artifacts))
    }
}

/// Turn one markdown source into a document.
///
/// The title comes from front matter, else the first section, else the key.
pub fn build_document(
    key: &str,
    source: &str,
    modified: DateTime<Utc>,
    words_per_minute: usize,
) -> Document {
    let parsed = parse_source(source);

    let title = string_value(&parsed.front_matter, "title")
        .or_else(|| parsed.sections.first().map(|s| s.title.clone()))
        .unwrap_or_else(|| key.to_string());
    let description = string_value(&parsed.front_matter, "description");
    let code_blocks_count = parsed
        .sections
        .iter()
        .map(|s| s.metadata.code_blocks_count)
        .sum();

    Document {
        title,
        description,
        metadata: DocumentMetadata {
            last_modified: modified.to_rfc3339_opts(SecondsFormat::Millis, true),
            word_count: parsed.word_count,
            reading_time: reading_time(parsed.word_count, words_per_minute),
            sections_count: parsed.sections.len(),
            code_blocks_count,
        },
        sections: parsed.sections,
        features: parsed.features,
        front_matter: parsed.front_matter,
    }
}

/// Minutes to read `word_count` words, rounded up.
pub fn reading_time(word_count: usize, words_per_minute: usize) -> usize {
    word_count.div_ceil(words_per_minute.max(1))
}

fn log_summary(data: &DocsData, artifacts: &Artifacts) {
    log::info!("Documentation data generated successfully");
    log::info!("Total locales: {}", data.len());

    for (locale, docs) in data {
        let sections: usize = docs.values().map(|d| d.sections.len()).sum();
        let code_blocks: usize = docs.values().map(|d| d.metadata.code_blocks_count).sum();
        let words: usize = docs.values().map(|d| d.metadata.word_count).sum();
        log::info!(
            "  {locale}: {} docs, {sections} sections, {code_blocks} code blocks, {words} words",
            docs.len()
        );
    }

    log::info!("Generated files:");
    for path in [
        &artifacts.structured_docs,
        &artifacts.section_mapping,
        &artifacts.types,
    ] {
        log::info!("  {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_docs_dir, create_test_file};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn options(root: &Path) -> GenerateOptions {
        GenerateOptions {
            docs_dir: root.join("docs"),
            data_dir: root.join("out/data"),
            types_dir: root.join("out/types"),
            ..GenerateOptions::default()
        }
    }

    #[test]
    fn test_build_document_metadata() {
        let source = "# Intro\n\nHello **world**\n\n```js\nx()\n```\n\n## Next\n\n```ts\ny()\n```\n";
        let doc = build_document("intro", source, timestamp(), 200);

        assert_eq!(doc.title, "Intro");
        assert_eq!(doc.description, None);
        assert_eq!(doc.metadata.sections_count, 2);
        assert_eq!(doc.metadata.code_blocks_count, 2);
        assert_eq!(doc.metadata.reading_time, 1);
        assert_eq!(doc.metadata.last_modified, "2024-05-01T12:30:00.000Z");
    }

    #[test]
    fn test_front_matter_overrides_title() {
        let source = "---\ntitle: Custom\ndescription: About it\n---\n# Heading\n";
        let doc = build_document("key", source, timestamp(), 200);
        assert_eq!(doc.title, "Custom");
        assert_eq!(doc.description.as_deref(), Some("About it"));
        assert_eq!(doc.front_matter.len(), 2);
    }

    #[test]
    fn test_folded_description_and_list_front_matter() {
        let source = "---\ntitle: Guide\ndescription: >\n  Learn the store\n  in five minutes\ntags:\n  - a\n  - b\n---\n# Heading\n";
        let doc = build_document("key", source, timestamp(), 200);
        assert_eq!(doc.title, "Guide");
        assert_eq!(doc.description.as_deref(), Some("Learn the store in five minutes"));
        assert_eq!(doc.front_matter["tags"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_title_falls_back_to_key() {
        let doc = build_document("notes", "no headings here", timestamp(), 200);
        assert_eq!(doc.title, "notes");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.metadata.word_count, 3);
    }

    #[rstest]
    #[case(0, 200, 0)]
    #[case(1, 200, 1)]
    #[case(200, 200, 1)]
    #[case(201, 200, 2)]
    #[case(10, 0, 10)]
    fn test_reading_time(#[case] words: usize, #[case] wpm: usize, #[case] expected: usize) {
        assert_eq!(reading_time(words, wpm), expected);
    }

    #[test]
    fn test_missing_locale_is_skipped() {
        let root = create_test_docs_dir();
        create_test_file(&root, "docs/en/guide.md", "# Guide\n\nText");

        let generated = Generator::new(options(root.path())).build().unwrap();

        assert_eq!(generated.data.keys().collect::<Vec<_>>(), vec!["en"]);
        // The absent locale is reported, not fatal.
        assert!(!generated.report.is_consistent());
    }

    #[test]
    fn test_missing_master_locale_is_fatal() {
        let root = create_test_docs_dir();
        create_test_file(&root, "docs/ru/guide.md", "# Руководство");

        let result = Generator::new(options(root.path())).build();
        assert!(matches!(result, Err(GenerateError::MasterLocaleMissing(l)) if l == "en"));
    }

    #[test]
    fn test_strict_mode_fails_on_mismatch() {
        let root = create_test_docs_dir();
        create_test_file(&root, "docs/en/guide.md", "# One\n\n# Two");
        create_test_file(&root, "docs/ru/guide.md", "# Один");

        let mut opts = options(root.path());
        assert!(Generator::new(opts.clone()).build().is_ok());

        opts.strict = true;
        let result = Generator::new(opts).build();
        assert!(matches!(result, Err(GenerateError::Inconsistent(_))));
    }

    #[test]
    fn test_write_artifacts() {
        let root = create_test_docs_dir();
        create_test_file(&root, "docs/en/guide.md", "# 🚀 Start\n\nText");
        create_test_file(&root, "docs/ru/guide.md", "# 🚀 Старт\n\nТекст");

        let generator = Generator::new(options(root.path()));
        let generated = generator.build().unwrap();
        let artifacts = generator.write_artifacts(&generated, timestamp()).unwrap();

        let mapping: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&artifacts.section_mapping).unwrap())
                .unwrap();
        assert_eq!(mapping, serde_json::json!({ "guide": { "0": "start" } }));

        let types = std::fs::read_to_string(&artifacts.types).unwrap();
        assert!(types.contains("// Generated at: 2024-05-01T12:30:00.000Z"));
        assert!(types.contains("'guide': 'start'"));
        assert!(artifacts.structured_docs.exists());
    }
}
