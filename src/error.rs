//! Error types for catalog construction and storage access.
//!
//! Only the catalog loader and the `KeyValueStore` backends return these.
//! Resolution, auditing and language switching always produce a value.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("unknown language code: '{0}'")]
    UnknownLanguage(String),

    #[error("storage unavailable for key '{key}': {reason}")]
    StorageUnavailable { key: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("section '{0}' does not define the reference language")]
    MissingReferenceLanguage(String),

    #[error("section '{0}' has a malformed reference language table")]
    MalformedReferenceLanguage(String),

    #[error("section '{0}' is defined more than once")]
    DuplicateSection(String),

    #[error("key '{key}' is published by both '{first}' and '{second}' for language '{language}'")]
    DuplicateKey {
        key: String,
        language: &'static str,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, I18nError>;
