//! Translation completeness auditing.
//!
//! Compares every language of every catalog section against the reference
//! language's key set. Keys that exist only in a non-reference language are
//! not reported; the reference language is authoritative.

use crate::i18n::{Catalog, Language, LanguageTable};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Sentinel text used when a whole language is absent from a section.
pub const ENTIRE_LANGUAGE_MISSING: &str = "entire language missing";

/// What is missing for one section/language pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingKeys {
    /// The section has no usable table for the language
    EntireLanguage,
    /// Keys present in the reference language but absent or blank here
    Keys(Vec<String>),
}

impl MissingKeys {
    pub fn is_entire_language(&self) -> bool {
        matches!(self, MissingKeys::EntireLanguage)
    }

    /// The missing keys, empty for `EntireLanguage`.
    pub fn keys(&self) -> &[String] {
        match self {
            MissingKeys::EntireLanguage => &[],
            MissingKeys::Keys(keys) => keys,
        }
    }
}

impl Serialize for MissingKeys {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MissingKeys::EntireLanguage => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(ENTIRE_LANGUAGE_MISSING)?;
                seq.end()
            }
            MissingKeys::Keys(keys) => keys.serialize(serializer),
        }
    }
}

/// Missing translations per section and language.
///
/// An empty report means every language is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuditReport {
    sections: BTreeMap<String, BTreeMap<Language, MissingKeys>>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no section has anything missing.
    pub fn is_complete(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn record(&mut self, section: &str, language: Language, missing: MissingKeys) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(language, missing);
    }

    /// Sections with at least one incomplete language.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn get(&self, section: &str, language: Language) -> Option<&MissingKeys> {
        self.sections
            .get(section)
            .and_then(|languages| languages.get(&language))
    }

    /// Incomplete languages of a section.
    pub fn languages_missing(&self, section: &str) -> Vec<Language> {
        self.sections
            .get(section)
            .map(|languages| languages.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of individually missing keys (whole-language gaps not counted).
    pub fn missing_key_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(|languages| languages.values())
            .map(|missing| missing.keys().len())
            .sum()
    }

    /// Number of section/language pairs where the whole language is absent.
    pub fn missing_language_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(|languages| languages.values())
            .filter(|missing| missing.is_entire_language())
            .count()
    }
}

/// Audits a catalog for completeness.
pub struct CompletenessAuditor;

impl CompletenessAuditor {
    /// Build the audit report for every section and every supported language.
    pub fn audit(catalog: &Catalog) -> AuditReport {
        let reference = Language::reference();
        let languages = Language::all();
        let mut report = AuditReport::new();

        for (name, section) in catalog.sections() {
            let reference_keys: Vec<&String> = match section.table(reference) {
                Some(LanguageTable::Table(entries)) => entries.keys().collect(),
                _ => Vec::new(),
            };

            for &language in &languages {
                let entries = match section.table(language) {
                    Some(LanguageTable::Table(entries)) => entries,
                    Some(LanguageTable::Malformed) | None => {
                        debug!("Section '{}' has no usable '{}' table", name, language);
                        report.record(name, language, MissingKeys::EntireLanguage);
                        continue;
                    }
                };

                let missing: Vec<String> = reference_keys
                    .iter()
                    .filter(|key| {
                        entries
                            .get(key.as_str())
                            .map_or(true, |value| value.trim().is_empty())
                    })
                    .map(|key| key.to_string())
                    .collect();

                if !missing.is_empty() {
                    report.record(name, language, MissingKeys::Keys(missing));
                }
            }
        }

        info!(
            "Audited {} sections: {} incomplete, {} missing keys, {} missing languages",
            catalog.section_count(),
            report.section_count(),
            report.missing_key_count(),
            report.missing_language_count()
        );

        report
    }
}
