use crate::i18n::{Language, StorageKeys};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Catalog
    pub catalog_dir: PathBuf,
    pub default_language: Language,

    // Preferences
    pub preferences_file: PathBuf,
    pub storage_keys: StorageKeys,

    // Browser locale guess
    pub browser_locale: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_language = match std::env::var("I18N_DEFAULT_LANGUAGE") {
            Ok(code) => Language::from_code(&code)
                .with_context(|| format!("I18N_DEFAULT_LANGUAGE '{}' is not supported", code))?,
            Err(_) => Language::ENGLISH,
        };

        let defaults = StorageKeys::default();

        Ok(Self {
            // Catalog
            catalog_dir: std::env::var("I18N_CATALOG_DIR")
                .unwrap_or_else(|_| "locales".to_string())
                .into(),
            default_language,

            // Preferences
            preferences_file: std::env::var("I18N_PREFERENCES_FILE")
                .unwrap_or_else(|_| ".waybank-preferences.json".to_string())
                .into(),
            storage_keys: StorageKeys {
                primary: non_empty_var("I18N_PRIMARY_KEY").unwrap_or(defaults.primary),
                legacy: non_empty_var("I18N_LEGACY_KEY").unwrap_or(defaults.legacy),
            },

            // Browser locale guess
            browser_locale: detect_browser_locale(),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The locale the host reports, checked in order: `I18N_BROWSER_LOCALE`,
/// `LC_ALL`, `LANG`.
fn detect_browser_locale() -> Option<String> {
    ["I18N_BROWSER_LOCALE", "LC_ALL", "LANG"]
        .into_iter()
        .find_map(non_empty_var)
}
