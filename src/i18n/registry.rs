//! Language registry: Single source of truth for all supported languages.
//!
//! The set of languages is closed. It is initialized once behind a `OnceLock`
//! and never changes afterwards; every `Language` value is validated against it.

use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value used for the document `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ar")
    pub code: &'static str,

    /// English name of the language (e.g., "Arabic")
    pub name: &'static str,

    /// Native name of the language (e.g., "العربية")
    pub native_name: &'static str,

    /// Writing direction used for the document root
    pub direction: TextDirection,

    /// Whether this is the reference language for completeness checks (only one should be true)
    pub is_reference: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Matching is ASCII case-insensitive, so `"EN"` and `"en"` both resolve.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// All languages, in display order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the reference language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one reference language.
    /// The table is static, so this only fires on a programming error.
    pub fn reference(&self) -> &LanguageConfig {
        let reference: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_reference)
            .collect();

        match reference.len() {
            0 => panic!("No reference language found in registry"),
            1 => reference[0],
            _ => panic!("Multiple reference languages found in registry"),
        }
    }

    /// Check if a language code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

/// The ten dashboard languages, in the order the language selector shows them.
fn default_languages() -> Vec<LanguageConfig> {
    use TextDirection::{Ltr, Rtl};

    let entry = |code, name, native_name, direction, is_reference| LanguageConfig {
        code,
        name,
        native_name,
        direction,
        is_reference,
    };

    vec![
        entry("es", "Spanish", "Español", Ltr, false),
        entry("en", "English", "English", Ltr, true),
        entry("fr", "French", "Français", Ltr, false),
        entry("de", "German", "Deutsch", Ltr, false),
        entry("pt", "Portuguese", "Português", Ltr, false),
        entry("it", "Italian", "Italiano", Ltr, false),
        entry("zh", "Chinese", "中文", Ltr, false),
        entry("hi", "Hindi", "हिन्दी", Ltr, false),
        entry("ar", "Arabic", "العربية", Rtl, false),
        entry("ru", "Russian", "Русский", Ltr, false),
    ]
}
