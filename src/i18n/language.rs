//! Language type: validated language representation.
//!
//! A `Language` can only be built from a code present in the registry, so
//! holding one is proof that the language is supported.

use crate::error::{I18nError, Result};
use crate::i18n::{LanguageConfig, LanguageRegistry, TextDirection};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "es")
    code: &'static str,
}

impl Language {
    pub const SPANISH: Language = Language { code: "es" };
    pub const ENGLISH: Language = Language { code: "en" };
    pub const FRENCH: Language = Language { code: "fr" };
    pub const GERMAN: Language = Language { code: "de" };
    pub const PORTUGUESE: Language = Language { code: "pt" };
    pub const ITALIAN: Language = Language { code: "it" };
    pub const CHINESE: Language = Language { code: "zh" };
    pub const HINDI: Language = Language { code: "hi" };
    pub const ARABIC: Language = Language { code: "ar" };
    pub const RUSSIAN: Language = Language { code: "ru" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is in the registry (case-insensitive)
    /// * `Err(I18nError::UnknownLanguage)` otherwise
    pub fn from_code(code: &str) -> Result<Language> {
        LanguageRegistry::get()
            .get_by_code(code.trim())
            .map(|config| Language { code: config.code })
            .ok_or_else(|| I18nError::UnknownLanguage(code.to_string()))
    }

    /// Parse a browser or system locale tag down to a supported language.
    ///
    /// Only the primary subtag is considered: `"pt-BR"`, `"pt_BR.UTF-8"` and
    /// `"pt@euro"` all map to Portuguese. `"C"` and `"POSIX"` map to English.
    pub fn from_locale_tag(tag: &str) -> Option<Language> {
        let tag = tag.trim();
        let tag = tag.split(['@', '.']).next().unwrap_or(tag);
        let primary = tag.split(['-', '_']).next().unwrap_or(tag).trim();

        if primary.eq_ignore_ascii_case("c") || primary.eq_ignore_ascii_case("posix") {
            return Some(Language::ENGLISH);
        }

        Language::from_code(primary).ok()
    }

    /// Resolve a code, substituting `default` for anything unsupported.
    pub fn coerce(code: &str, default: Language) -> Language {
        Language::from_code(code).unwrap_or(default)
    }

    /// Get the reference language (English).
    ///
    /// Every catalog section must define it, and the auditor compares all
    /// other languages against its key set.
    pub fn reference() -> Language {
        Language {
            code: LanguageRegistry::get().reference().code,
        }
    }

    /// All supported languages, in registry order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This cannot
    /// happen for values built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language (e.g., "Español").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn direction(&self) -> TextDirection {
        self.config().direction
    }

    /// Check if this is the reference language.
    pub fn is_reference(&self) -> bool {
        self.config().is_reference
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl std::str::FromStr for Language {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Constant Tests ====================

    #[test]
    fn test_constants_match_registry() {
        for language in [
            Language::SPANISH,
            Language::ENGLISH,
            Language::FRENCH,
            Language::GERMAN,
            Language::PORTUGUESE,
            Language::ITALIAN,
            Language::CHINESE,
            Language::HINDI,
            Language::ARABIC,
            Language::RUSSIAN,
        ] {
            assert_eq!(Language::from_code(language.code()).unwrap(), language);
        }
    }

    #[test]
    fn test_english_is_reference() {
        assert!(Language::ENGLISH.is_reference());
        assert!(!Language::SPANISH.is_reference());
        assert_eq!(Language::reference(), Language::ENGLISH);
    }

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_valid() {
        let language = Language::from_code("de").expect("Should succeed");
        assert_eq!(language, Language::GERMAN);
        assert_eq!(language.name(), "German");
        assert_eq!(language.native_name(), "Deutsch");
    }

    #[test]
    fn test_from_code_uppercase() {
        assert_eq!(Language::from_code("RU").unwrap(), Language::RUSSIAN);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("xx");
        assert!(matches!(result, Err(I18nError::UnknownLanguage(code)) if code == "xx"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
    }

    // ==================== Locale Tag Tests ====================

    #[test]
    fn test_from_locale_tag_browser_style() {
        assert_eq!(Language::from_locale_tag("pt-BR"), Some(Language::PORTUGUESE));
        assert_eq!(Language::from_locale_tag("zh-Hans-CN"), Some(Language::CHINESE));
    }

    #[test]
    fn test_from_locale_tag_posix_style() {
        assert_eq!(Language::from_locale_tag("es_ES.UTF-8"), Some(Language::SPANISH));
        assert_eq!(Language::from_locale_tag("de_DE@euro"), Some(Language::GERMAN));
        assert_eq!(Language::from_locale_tag("C"), Some(Language::ENGLISH));
        assert_eq!(Language::from_locale_tag("POSIX"), Some(Language::ENGLISH));
    }

    #[test]
    fn test_from_locale_tag_unsupported() {
        assert_eq!(Language::from_locale_tag("ja-JP"), None);
        assert_eq!(Language::from_locale_tag(""), None);
    }

    // ==================== coerce Tests ====================

    #[test]
    fn test_coerce_supported_code() {
        assert_eq!(Language::coerce("fr", Language::ENGLISH), Language::FRENCH);
    }

    #[test]
    fn test_coerce_unsupported_code_uses_default() {
        assert_eq!(Language::coerce("xx", Language::SPANISH), Language::SPANISH);
    }

    // ==================== Metadata Tests ====================

    #[test]
    fn test_direction() {
        assert_eq!(Language::ARABIC.direction(), TextDirection::Rtl);
        assert_eq!(Language::HINDI.direction(), TextDirection::Ltr);
    }

    #[test]
    fn test_all_languages_in_registry_order() {
        let all = Language::all();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], Language::SPANISH);
        assert_eq!(all[1], Language::ENGLISH);
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Language::ITALIAN.to_string(), "it");
        let parsed: Language = "it".parse().unwrap();
        assert_eq!(parsed, Language::ITALIAN);
    }

    #[test]
    fn test_serde_as_code() {
        let json = serde_json::to_string(&Language::HINDI).unwrap();
        assert_eq!(json, "\"hi\"");

        let parsed: Language = serde_json::from_str("\"ar\"").unwrap();
        assert_eq!(parsed, Language::ARABIC);

        assert!(serde_json::from_str::<Language>("\"xx\"").is_err());
    }
}
