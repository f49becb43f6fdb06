//! Document-level text direction and language attributes.

use crate::i18n::{Language, TextDirection};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the direction attribute on the document root.
pub const DIR_ATTRIBUTE: &str = "dir";

/// Name of the language attribute on the document root.
pub const LANG_ATTRIBUTE: &str = "lang";

/// The root element whose attributes reflect the active language.
pub trait DocumentRoot {
    fn attribute(&self, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// In-memory document root that counts attribute writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentAttributes {
    attributes: BTreeMap<String, String>,
    writes: usize,
}

impl DocumentAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_attribute` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn direction(&self) -> Option<&str> {
        self.attribute(DIR_ATTRIBUTE)
    }

    pub fn lang(&self) -> Option<&str> {
        self.attribute(LANG_ATTRIBUTE)
    }
}

impl DocumentRoot for DocumentAttributes {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.writes += 1;
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

/// Keeps `dir` and `lang` on the document root in line with the active language.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalityManager;

impl DirectionalityManager {
    pub fn new() -> Self {
        Self
    }

    /// Direction for a language: right-to-left for Arabic, left-to-right otherwise.
    pub fn direction_for(language: Language) -> TextDirection {
        language.direction()
    }

    /// Apply the language's direction and code to the document root.
    ///
    /// Only attributes whose value differs are written, so repeated calls
    /// with the same language have no effect. Returns whether anything
    /// changed.
    pub fn apply(&self, document: &mut dyn DocumentRoot, language: Language) -> bool {
        let direction = Self::direction_for(language);
        let mut changed = false;

        for (name, value) in [
            (DIR_ATTRIBUTE, direction.as_str()),
            (LANG_ATTRIBUTE, language.code()),
        ] {
            if document.attribute(name) != Some(value) {
                document.set_attribute(name, value);
                changed = true;
            }
        }

        if changed {
            debug!("Document set to lang='{}' dir='{}'", language, direction);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_for_languages() {
        assert_eq!(
            DirectionalityManager::direction_for(Language::ARABIC),
            TextDirection::Rtl
        );
        for language in Language::all() {
            if language != Language::ARABIC {
                assert_eq!(
                    DirectionalityManager::direction_for(language),
                    TextDirection::Ltr
                );
            }
        }
    }

    #[test]
    fn test_apply_sets_attributes() {
        let mut document = DocumentAttributes::new();
        let manager = DirectionalityManager::new();

        assert!(manager.apply(&mut document, Language::ARABIC));
        assert_eq!(document.direction(), Some("rtl"));
        assert_eq!(document.lang(), Some("ar"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut document = DocumentAttributes::new();
        let manager = DirectionalityManager::new();

        manager.apply(&mut document, Language::ARABIC);
        let after_first = document.clone();

        assert!(!manager.apply(&mut document, Language::ARABIC));
        assert_eq!(document, after_first);
        assert_eq!(document.writes(), 2);
    }

    #[test]
    fn test_switch_between_ltr_languages_only_touches_lang() {
        let mut document = DocumentAttributes::new();
        let manager = DirectionalityManager::new();

        manager.apply(&mut document, Language::ENGLISH);
        assert!(manager.apply(&mut document, Language::GERMAN));

        assert_eq!(document.direction(), Some("ltr"));
        assert_eq!(document.lang(), Some("de"));
        assert_eq!(document.writes(), 3);
    }

    #[test]
    fn test_switch_back_from_rtl() {
        let mut document = DocumentAttributes::new();
        let manager = DirectionalityManager::new();

        manager.apply(&mut document, Language::ARABIC);
        manager.apply(&mut document, Language::SPANISH);

        assert_eq!(document.direction(), Some("ltr"));
        assert_eq!(document.lang(), Some("es"));
    }
}
