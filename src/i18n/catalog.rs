//! Locale catalog: every translation table, composed once at startup.
//!
//! A catalog is a set of named sections. Each section maps a language to a
//! flat table of key → value (nested JSON records are flattened into dotted
//! keys). Sections are either namespaced, where a key `cooldownActive` in
//! section `positions` resolves as `positions.cooldownActive`, or root, where
//! keys resolve verbatim.
//!
//! The catalog is immutable after `CatalogBuilder::build`. Adding sections
//! later means building a new catalog with `Catalog::merge`.

use crate::error::{I18nError, Result};
use crate::i18n::strings::{builtin_common_words, CommonWordTable};
use crate::i18n::Language;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, trace, warn};

/// File stem of the optional common-words table in a catalog directory.
const COMMON_WORDS_FILE_STEM: &str = "common";

/// Prefix marking a root section file in a catalog directory.
const ROOT_SECTION_PREFIX: char = '_';

/// One language's entries within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageTable {
    /// Flattened key → value entries
    Table(BTreeMap<String, String>),

    /// The source value was not a record; treated as "entire language missing"
    Malformed,
}

impl LanguageTable {
    /// Build a table from a JSON value, flattening nested records.
    pub fn from_value(value: &Value) -> LanguageTable {
        match value {
            Value::Object(map) => {
                let mut entries = BTreeMap::new();
                flatten_into("", map, &mut entries);
                LanguageTable::Table(entries)
            }
            _ => LanguageTable::Malformed,
        }
    }

    /// Get the raw value for a key. Blank values are returned as-is.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            LanguageTable::Table(entries) => entries.get(key).map(String::as_str),
            LanguageTable::Malformed => None,
        }
    }

    /// The entries, or `None` for a malformed table.
    pub fn entries(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            LanguageTable::Table(entries) => Some(entries),
            LanguageTable::Malformed => None,
        }
    }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            Value::Object(nested) => flatten_into(&full_key, nested, out),
            Value::Number(number) => {
                out.insert(full_key, number.to_string());
            }
            Value::Bool(flag) => {
                out.insert(full_key, flag.to_string());
            }
            Value::Null | Value::Array(_) => {
                trace!("Skipping non-text catalog entry '{}'", full_key);
            }
        }
    }
}

/// A named grouping of related keys, one table per language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    tables: BTreeMap<Language, LanguageTable>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language table from key/value pairs.
    pub fn with<K, V>(mut self, language: Language, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.tables.insert(language, LanguageTable::Table(entries));
        self
    }

    /// Mark a language as present but malformed.
    pub fn with_malformed(mut self, language: Language) -> Self {
        self.tables.insert(language, LanguageTable::Malformed);
        self
    }

    pub fn insert(&mut self, language: Language, table: LanguageTable) {
        self.tables.insert(language, table);
    }

    /// Build a section from a `{ "<lang>": { ... } }` JSON document.
    ///
    /// Unknown language codes are skipped. A document that is not a record
    /// yields an empty section, which `CatalogBuilder::build` rejects.
    pub fn from_json(name: &str, value: &Value) -> Section {
        let mut section = Section::new();

        let Some(languages) = value.as_object() else {
            warn!("Section '{}' is not a record of languages", name);
            return section;
        };

        for (code, table) in languages {
            match Language::from_code(code) {
                Ok(language) => section.insert(language, LanguageTable::from_value(table)),
                Err(_) => warn!("Section '{}': skipping unsupported language '{}'", name, code),
            }
        }

        section
    }

    pub fn table(&self, language: Language) -> Option<&LanguageTable> {
        self.tables.get(&language)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.tables.keys().copied()
    }
}

/// How a section's keys are addressed by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionScope {
    /// Keys resolve as `<section>.<key>`
    Namespaced,
    /// Keys resolve verbatim
    Root,
}

#[derive(Debug, Clone)]
struct CatalogSection {
    scope: SectionScope,
    section: Section,
}

/// The composed, read-only translation catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    sections: BTreeMap<String, CatalogSection>,
    index: HashMap<Language, HashMap<String, String>>,
    common_words: CommonWordTable,
    common_overrides: CommonWordTable,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// A catalog with no sections and the built-in common words.
    pub fn empty() -> Catalog {
        Catalog {
            sections: BTreeMap::new(),
            index: HashMap::new(),
            common_words: builtin_common_words(),
            common_overrides: CommonWordTable::new(),
        }
    }

    /// Raw value published for a resolvable key. Blank values are returned
    /// as-is; deciding that blank means absent is the resolver's job.
    pub fn lookup(&self, key: &str, language: Language) -> Option<&str> {
        self.index
            .get(&language)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name).map(|entry| &entry.section)
    }

    /// Sections in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.section))
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn common_word(&self, language: Language, word: &str) -> Option<&str> {
        self.common_words
            .get(&language)
            .and_then(|words| words.get(word))
            .map(String::as_str)
    }

    /// Combine two catalogs into a new one.
    ///
    /// The same invariants as `CatalogBuilder::build` apply. Common-word
    /// overrides from both catalogs are kept; `other` wins where both set one.
    pub fn merge(self, other: Catalog) -> Result<Catalog> {
        let mut builder = CatalogBuilder {
            sections: Vec::new(),
            common_overrides: self.common_overrides,
        };

        for (name, entry) in self.sections.into_iter().chain(other.sections) {
            builder.sections.push((name, entry.scope, entry.section));
        }

        builder.common_words(other.common_overrides).build()
    }

    /// Load every `*.json` file in a directory.
    ///
    /// - `common.json` is the common-words table (`{lang: {word: value}}`)
    /// - `_<name>.json` is a root section called `<name>`
    /// - `<name>.json` is a namespaced section called `<name>`
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Catalog> {
        let dir = dir.as_ref();
        let read_dir = fs::read_dir(dir).map_err(|source| I18nError::CatalogIo {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| I18nError::CatalogIo {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut builder = CatalogBuilder::new();
        for path in &paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("Skipping catalog file with a non UTF-8 name: {}", path.display());
                continue;
            };

            let contents = fs::read_to_string(path).map_err(|source| I18nError::CatalogIo {
                path: path.clone(),
                source,
            })?;
            let value: Value =
                serde_json::from_str(&contents).map_err(|source| I18nError::CatalogParse {
                    path: path.clone(),
                    source,
                })?;

            if stem == COMMON_WORDS_FILE_STEM {
                builder = builder.common_words(common_words_from_json(&value));
            } else if let Some(name) = stem.strip_prefix(ROOT_SECTION_PREFIX) {
                let section = Section::from_json(name, &value);
                builder = builder.root_section(name, section);
            } else {
                let section = Section::from_json(stem, &value);
                builder = builder.section(stem, section);
            }
        }

        let catalog = builder.build()?;
        info!(
            "Loaded {} catalog sections from {}",
            catalog.section_count(),
            dir.display()
        );
        Ok(catalog)
    }
}

fn common_words_from_json(value: &Value) -> CommonWordTable {
    let mut table = CommonWordTable::new();

    let Some(languages) = value.as_object() else {
        warn!("Common words file is not a record of languages");
        return table;
    };

    for (code, words) in languages {
        let Ok(language) = Language::from_code(code) else {
            warn!("Common words: skipping unsupported language '{}'", code);
            continue;
        };
        if let LanguageTable::Table(entries) = LanguageTable::from_value(words) {
            table.insert(language, entries);
        }
    }

    table
}

/// Composes sections into a `Catalog`, enforcing its invariants.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    sections: Vec<(String, SectionScope, Section)>,
    common_overrides: CommonWordTable,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    /// Start a builder. The built catalog gets the built-in common words
    /// plus any overrides added with `common_words`.
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            common_overrides: CommonWordTable::new(),
        }
    }

    /// Add a namespaced section.
    pub fn section(mut self, name: impl Into<String>, section: Section) -> Self {
        self.sections
            .push((name.into(), SectionScope::Namespaced, section));
        self
    }

    /// Add a root section whose keys resolve without a prefix.
    pub fn root_section(mut self, name: impl Into<String>, section: Section) -> Self {
        self.sections.push((name.into(), SectionScope::Root, section));
        self
    }

    /// Overlay common words; entries here win over built-in and earlier ones.
    pub fn common_words(mut self, table: CommonWordTable) -> Self {
        for (language, words) in table {
            self.common_overrides.entry(language).or_default().extend(words);
        }
        self
    }

    /// Validate and index the sections.
    ///
    /// # Errors
    /// - `DuplicateSection` if two sections share a name
    /// - `MissingReferenceLanguage` / `MalformedReferenceLanguage` if a section
    ///   has no usable reference table
    /// - `DuplicateKey` if two sections publish the same resolvable key for
    ///   the same language
    pub fn build(self) -> Result<Catalog> {
        let reference = Language::reference();
        let mut sections = BTreeMap::new();
        let mut index: HashMap<Language, HashMap<String, String>> = HashMap::new();
        let mut owners: HashMap<(Language, String), String> = HashMap::new();

        for (name, scope, section) in self.sections {
            if sections.contains_key(&name) {
                return Err(I18nError::DuplicateSection(name));
            }

            match section.table(reference) {
                None => return Err(I18nError::MissingReferenceLanguage(name)),
                Some(LanguageTable::Malformed) => {
                    return Err(I18nError::MalformedReferenceLanguage(name))
                }
                Some(LanguageTable::Table(_)) => {}
            }

            for (language, table) in &section.tables {
                let Some(entries) = table.entries() else {
                    debug!("Section '{}' has a malformed '{}' table", name, language);
                    continue;
                };

                for (key, value) in entries {
                    let resolvable = match scope {
                        SectionScope::Namespaced => format!("{}.{}", name, key),
                        SectionScope::Root => key.clone(),
                    };

                    if let Some(first) = owners.get(&(*language, resolvable.clone())) {
                        return Err(I18nError::DuplicateKey {
                            key: resolvable,
                            language: language.code(),
                            first: first.clone(),
                            second: name,
                        });
                    }
                    owners.insert((*language, resolvable.clone()), name.clone());

                    index
                        .entry(*language)
                        .or_default()
                        .insert(resolvable, value.clone());
                }
            }

            sections.insert(name, CatalogSection { scope, section });
        }

        let mut common_words = builtin_common_words();
        for (language, words) in &self.common_overrides {
            common_words.entry(*language).or_default().extend(words.clone());
        }

        Ok(Catalog {
            sections,
            index,
            common_words,
            common_overrides: self.common_overrides,
        })
    }
}
