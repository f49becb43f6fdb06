//! Persisted language preference.
//!
//! The selected language is stored under two keys: the primary key and a
//! legacy key that older readers still consult. Reads prefer the primary key
//! and migrate a legacy-only value forward. Storage failures never escape:
//! after the first one the store keeps working from memory for the rest of
//! the session.

use crate::error::{I18nError, Result};
use crate::i18n::Language;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A simple string key-value store (browser-style local storage).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with values.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RefCell::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// A missing file reads as empty. Every `set` rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self, key: &str) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(unavailable(key, e)),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents).map_err(|e| unavailable(key, e))? {
            Value::Object(map) => Ok(map),
            _ => Err(unavailable(
                key,
                format!("{} does not contain a JSON object", self.path.display()),
            )),
        }
    }
}

fn unavailable(key: &str, reason: impl ToString) -> I18nError {
    I18nError::StorageUnavailable {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let map = self.read_map(key)?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map(key)?;
        map.insert(key.to_string(), Value::String(value.to_string()));

        let contents =
            serde_json::to_string_pretty(&Value::Object(map)).map_err(|e| unavailable(key, e))?;
        fs::write(&self.path, contents).map_err(|e| unavailable(key, e))
    }
}

/// Names of the two persisted keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Key read first and always written
    pub primary: String,

    /// Legacy-compatible key, also always written
    pub legacy: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            primary: "waybank_language".to_string(),
            legacy: "language".to_string(),
        }
    }
}

/// Loads and saves the user's language.
pub struct PreferenceStore {
    backend: Box<dyn KeyValueStore>,
    keys: StorageKeys,
    default_language: Language,
    memory: RefCell<HashMap<String, String>>,
    degraded: Cell<bool>,
}

impl PreferenceStore {
    pub fn new(
        backend: Box<dyn KeyValueStore>,
        keys: StorageKeys,
        default_language: Language,
    ) -> Self {
        Self {
            backend,
            keys,
            default_language,
            memory: RefCell::new(HashMap::new()),
            degraded: Cell::new(false),
        }
    }

    /// In-memory store with the default key names.
    pub fn in_memory(default_language: Language) -> Self {
        Self::new(
            Box::new(MemoryStore::new()),
            StorageKeys::default(),
            default_language,
        )
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Whether storage has failed and the store is running from memory.
    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    /// Determine the initial language.
    ///
    /// Order: primary key, legacy key (copied to the primary key), the
    /// browser's locale guess, then the default language. Stored values that
    /// are not supported languages are ignored.
    pub fn load(&self, browser_guess: Option<&str>) -> Language {
        if let Some(language) = self.read_language(&self.keys.primary) {
            debug!("Loaded language '{}' from '{}'", language, self.keys.primary);
            return language;
        }

        if let Some(language) = self.read_language(&self.keys.legacy) {
            info!(
                "Migrating language '{}' from '{}' to '{}'",
                language, self.keys.legacy, self.keys.primary
            );
            self.write(&self.keys.primary, language.code());
            return language;
        }

        if let Some(language) = browser_guess.and_then(Language::from_locale_tag) {
            debug!("Using browser language '{}'", language);
            return language;
        }

        debug!("Using default language '{}'", self.default_language);
        self.default_language
    }

    /// Persist the language under both keys.
    pub fn save(&self, language: Language) {
        self.write(&self.keys.primary, language.code());
        self.write(&self.keys.legacy, language.code());
    }

    /// Raw value currently stored under a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.read(key)
    }

    fn read_language(&self, key: &str) -> Option<Language> {
        let value = self.read(key)?;
        match Language::from_code(&value) {
            Ok(language) => Some(language),
            Err(_) => {
                debug!("Ignoring unsupported stored language '{}' under '{}'", value, key);
                None
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        if self.degraded.get() {
            return self.memory.borrow().get(key).cloned();
        }

        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                self.degrade(&e);
                self.memory.borrow().get(key).cloned()
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if !self.degraded.get() {
            match self.backend.set(key, value) {
                Ok(()) => return,
                Err(e) => self.degrade(&e),
            }
        }

        self.memory
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn degrade(&self, error: &I18nError) {
        if !self.degraded.replace(true) {
            warn!(
                "Language storage unavailable, keeping preferences in memory: {}",
                error
            );
        }
    }
}
