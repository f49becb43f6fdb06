//! Key resolution with fallback and `{{name}}` interpolation.
//!
//! Fallback chain, first match wins:
//! 1. the catalog value for the requested language
//! 2. the catalog value for the reference language
//! 3. the caller's default value
//! 4. the key itself
//!
//! The requested-language value and the default value count as absent when
//! they are blank (empty or whitespace only). The reference value only has to
//! be non-empty. The resolver never hands an empty string to the UI for a
//! non-empty key.

use crate::i18n::{Catalog, Language};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Interpolation values, stringified on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, rendering the value with `Display`.
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Variables::new();
        for (name, value) in iter {
            variables.insert(name, value);
        }
        variables
    }
}

/// Replace every `{{name}}` whose (trimmed) name is present in `variables`.
///
/// Unknown placeholders stay in the output verbatim, braces included.
pub fn interpolate(text: &str, variables: &Variables) -> String {
    if variables.is_empty() || !text.contains("{{") {
        return text.to_string();
    }

    let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

    regex
        .replace_all(text, |caps: &Captures| {
            let name = caps[1].trim();
            match variables.get(name) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Where a resolved string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The requested language had a value
    Requested,
    /// Fell back to the reference language
    Reference,
    /// Fell back to the caller's default value
    DefaultValue,
    /// Nothing matched; the key itself is shown
    Key,
}

/// A resolved string together with its fallback source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub source: ResolutionSource,
}

/// Optional arguments of a translation call.
///
/// Implemented for `()`, `&str` (default value), `&Variables` and
/// `(&str, &Variables)`, so `t(key, "Fallback")`, `t(key, &vars)` and
/// `t(key, ("Fallback", &vars))` all go through the same entry point.
pub trait ResolveArgs<'a> {
    fn into_parts(self) -> (Option<&'a str>, Option<&'a Variables>);
}

impl<'a> ResolveArgs<'a> for () {
    fn into_parts(self) -> (Option<&'a str>, Option<&'a Variables>) {
        (None, None)
    }
}

impl<'a> ResolveArgs<'a> for &'a str {
    fn into_parts(self) -> (Option<&'a str>, Option<&'a Variables>) {
        (Some(self), None)
    }
}

impl<'a> ResolveArgs<'a> for &'a Variables {
    fn into_parts(self) -> (Option<&'a str>, Option<&'a Variables>) {
        (None, Some(self))
    }
}

impl<'a> ResolveArgs<'a> for (&'a str, &'a Variables) {
    fn into_parts(self) -> (Option<&'a str>, Option<&'a Variables>) {
        (Some(self.0), Some(self.1))
    }
}

impl<'a> ResolveArgs<'a> for (Option<&'a str>, Option<&'a Variables>) {
    fn into_parts(self) -> (Option<&'a str>, Option<&'a Variables>) {
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Resolves keys against a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct KeyResolver {
    catalog: Arc<Catalog>,
    default_language: Language,
}

impl KeyResolver {
    /// Create a resolver.
    ///
    /// `default_language` replaces any unsupported code passed to
    /// `resolve_code`.
    pub fn new(catalog: Arc<Catalog>, default_language: Language) -> Self {
        Self {
            catalog,
            default_language,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Resolve a key to display text. Never fails and never returns an empty
    /// string for a non-empty key.
    pub fn resolve(
        &self,
        key: &str,
        language: Language,
        default_value: Option<&str>,
        variables: Option<&Variables>,
    ) -> String {
        self.resolve_detailed(key, language, default_value, variables)
            .text
    }

    /// Like `resolve`, but takes a raw language code and treats unsupported
    /// codes as the default language.
    pub fn resolve_code(
        &self,
        key: &str,
        code: &str,
        default_value: Option<&str>,
        variables: Option<&Variables>,
    ) -> String {
        let language = Language::coerce(code, self.default_language);
        if language.code() != code {
            trace!("Language '{}' coerced to '{}'", code, language);
        }
        self.resolve(key, language, default_value, variables)
    }

    /// Resolve a key and report which step of the fallback chain produced it.
    pub fn resolve_detailed(
        &self,
        key: &str,
        language: Language,
        default_value: Option<&str>,
        variables: Option<&Variables>,
    ) -> Resolution {
        let (selected, source) = self.select(key, language, default_value);

        let text = match variables {
            Some(variables) => interpolate(selected, variables),
            None => selected.to_string(),
        };

        Resolution { text, source }
    }

    fn select<'a>(
        &'a self,
        key: &'a str,
        language: Language,
        default_value: Option<&'a str>,
    ) -> (&'a str, ResolutionSource) {
        if key.is_empty() {
            debug!("Resolver called with an empty key");
        }

        if let Some(text) = non_blank(self.catalog.lookup(key, language)) {
            return (text, ResolutionSource::Requested);
        }

        let reference = Language::reference();
        if let Some(text) = non_empty(self.catalog.lookup(key, reference)) {
            if language == reference {
                return (text, ResolutionSource::Requested);
            }
            trace!("Key '{}' missing for '{}', using '{}'", key, language, reference);
            return (text, ResolutionSource::Reference);
        }

        if let Some(text) = non_blank(default_value) {
            trace!("Key '{}' missing for '{}', using default value", key, language);
            return (text, ResolutionSource::DefaultValue);
        }

        debug!("Key '{}' has no translation for '{}'", key, language);
        (key, ResolutionSource::Key)
    }
}
