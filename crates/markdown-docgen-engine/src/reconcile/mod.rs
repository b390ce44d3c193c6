//! # Cross-Locale Section IDs
//!
//! Every locale carries the same documents with translated titles, so section
//! ids cannot be derived from each locale's own titles. Instead the master
//! locale's titles define a canonical slug per section *position*, and every
//! locale's sections are renamed by position.
//!
//! This relies on all locales having the same sections in the same order.
//! [`validate_consistency`] reports where they do not; nothing is repaired.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{DocsData, LocaleDocs, SectionIdMapping};
use crate::parsing::canonical_section_id;

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Master locale '{0}' not found; it is required for consistent section IDs")]
    MasterLocaleMissing(String),
    #[error("Sections are inconsistent across locales ({0} warnings)")]
    Inconsistent(usize),
}

/// Derive `document key -> index -> slug` from the master locale's documents.
pub fn create_master_mapping(master: &LocaleDocs) -> SectionIdMapping {
    master
        .iter()
        .map(|(key, doc)| {
            let ids = doc
                .sections
                .iter()
                .enumerate()
                .map(|(index, section)| (index, canonical_section_id(&section.title, index)))
                .collect();
            (key.clone(), ids)
        })
        .collect()
}

/// Overwrite every section id in every locale with the mapped id at the same
/// position.
///
/// Positions beyond the master's section count get `section-<index>`.
/// Documents the master locale does not have are left untouched.
pub fn apply_mapping(data: &mut DocsData, mapping: &SectionIdMapping) {
    for docs in data.values_mut() {
        for (key, doc) in docs.iter_mut() {
            let Some(ids) = mapping.get(key) else {
                continue;
            };
            for (index, section) in doc.sections.iter_mut().enumerate() {
                section.id = ids
                    .get(&index)
                    .cloned()
                    .unwrap_or_else(|| format!("section-{index}"));
            }
        }
    }
}

/// Build the mapping from `master_locale` and apply it to all locales.
pub fn reconcile_section_ids(
    data: &mut DocsData,
    master_locale: &str,
) -> Result<SectionIdMapping, ReconcileError> {
    let master = data
        .get(master_locale)
        .ok_or_else(|| ReconcileError::MasterLocaleMissing(master_locale.to_string()))?;

    let mapping = create_master_mapping(master);
    apply_mapping(data, &mapping);
    Ok(mapping)
}

/// A structural disagreement between locales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyWarning {
    /// `locale` has no section at `index` of `doc_key`.
    MissingSection {
        doc_key: String,
        index: usize,
        locale: String,
    },
    /// Not every locale reported a title for `index` of `doc_key`.
    IncompleteLocales {
        doc_key: String,
        index: usize,
        present: usize,
        expected: usize,
    },
    /// `locale` has a different number of sections than the master locale.
    SectionCountMismatch {
        doc_key: String,
        locale: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyWarning::MissingSection {
                doc_key,
                index,
                locale,
            } => write!(f, "{doc_key}[{index}] is missing in locale '{locale}'"),
            ConsistencyWarning::IncompleteLocales {
                doc_key,
                index,
                present,
                expected,
            } => write!(
                f,
                "Inconsistent section count for {doc_key}[{index}]: {present} of {expected} locales"
            ),
            ConsistencyWarning::SectionCountMismatch {
                doc_key,
                locale,
                expected,
                actual,
            } => write!(
                f,
                "{doc_key} has {actual} sections in locale '{locale}', master has {expected}"
            ),
        }
    }
}

/// Titles per locale for one mapped section position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionComparison {
    pub index: usize,
    pub id: String,
    /// Locale to title; `None` when the locale has no section at this index.
    pub titles: BTreeMap<String, Option<String>>,
}

/// The outcome of the diagnostic pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Document key to per-position title comparisons.
    pub documents: BTreeMap<String, Vec<SectionComparison>>,
    pub warnings: Vec<ConsistencyWarning>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fail when any warning was raised.
    pub fn into_strict(self) -> Result<Self, ReconcileError> {
        if self.is_consistent() {
            Ok(self)
        } else {
            Err(ReconcileError::Inconsistent(self.warnings.len()))
        }
    }
}

/// Compare section titles across `locales` for every mapped position.
///
/// Logs the comparison at debug level and each mismatch as a warning. Never
/// fails; see [`ConsistencyReport::into_strict`] for the strict variant.
pub fn validate_consistency(
    data: &DocsData,
    mapping: &SectionIdMapping,
    locales: &[String],
) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();
    log::info!("Validating section consistency...");

    for (doc_key, ids) in mapping {
        log::debug!("{doc_key}:");
        let mut comparisons = Vec::with_capacity(ids.len());

        for (&index, id) in ids {
            let titles: BTreeMap<String, Option<String>> = locales
                .iter()
                .map(|locale| {
                    let title = data
                        .get(locale)
                        .and_then(|docs| docs.get(doc_key))
                        .and_then(|doc| doc.sections.get(index))
                        .map(|section| section.title.clone());
                    (locale.clone(), title)
                })
                .collect();

            log::debug!("  [{index}] {id}");
            for (locale, title) in &titles {
                match title {
                    Some(title) => log::debug!("    ok {locale}: \"{title}\""),
                    None => {
                        log::debug!("    missing {locale}");
                        report.warnings.push(ConsistencyWarning::MissingSection {
                            doc_key: doc_key.clone(),
                            index,
                            locale: locale.clone(),
                        });
                    }
                }
            }

            let present = titles.values().filter(|t| t.is_some()).count();
            if present != locales.len() {
                report.warnings.push(ConsistencyWarning::IncompleteLocales {
                    doc_key: doc_key.clone(),
                    index,
                    present,
                    expected: locales.len(),
                });
            }

            comparisons.push(SectionComparison {
                index,
                id: id.clone(),
                titles,
            });
        }

        for locale in locales {
            let Some(doc) = data.get(locale).and_then(|docs| docs.get(doc_key)) else {
                continue;
            };
            if doc.sections.len() != ids.len() {
                report.warnings.push(ConsistencyWarning::SectionCountMismatch {
                    doc_key: doc_key.clone(),
                    locale: locale.clone(),
                    expected: ids.len(),
                    actual: doc.sections.len(),
                });
            }
        }

        report.documents.insert(doc_key.clone(), comparisons);
    }

    for warning in &report.warnings {
        log::warn!("{warning}");
    }

    report
}
