//! Translation resolution and language consistency for the dashboard.
//!
//! All language-related logic lives here: the language registry, the
//! translation catalog, key resolution with fallback, completeness auditing,
//! preference persistence, document directionality and the two synchronized
//! language containers.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for supported languages and their metadata
//! - `language`: Type-safe `Language` handle validated against the registry
//! - `strings`: Built-in common-word table
//! - `catalog`: Immutable translation catalog and its builder/loader
//! - `resolver`: Key resolution with fallback and `{{name}}` interpolation
//! - `auditor`: Missing-translation report against the reference language
//! - `metrics`: Counters for which fallback step produced each string
//! - `preferences`: Persisted language preference with legacy key migration
//! - `direction`: `dir`/`lang` attributes on the document root
//! - `state` / `sync`: Observable language containers and their reconciliation
//! - `session`: The facade UI code calls
//!
//! # Example
//!
//! ```rust,ignore
//! use waybank_i18n::i18n::{Catalog, Language, KeyResolver, Variables};
//!
//! let catalog = Arc::new(Catalog::load_dir("locales")?);
//! let resolver = KeyResolver::new(catalog, Language::ENGLISH);
//!
//! let vars = Variables::new().with("days", 3);
//! let text = resolver.resolve("positions.cooldownActive", Language::SPANISH, None, Some(&vars));
//! ```

mod auditor;
mod catalog;
mod direction;
mod language;
mod metrics;
mod preferences;
mod registry;
mod resolver;
mod session;
mod state;
mod strings;
mod sync;

pub use auditor::{AuditReport, CompletenessAuditor, MissingKeys, ENTIRE_LANGUAGE_MISSING};
pub use catalog::{Catalog, CatalogBuilder, LanguageTable, Section, SectionScope};
pub use direction::{
    DirectionalityManager, DocumentAttributes, DocumentRoot, DIR_ATTRIBUTE, LANG_ATTRIBUTE,
};
pub use language::Language;
pub use metrics::{MetricsReport, ResolutionMetrics};
pub use preferences::{JsonFileStore, KeyValueStore, MemoryStore, PreferenceStore, StorageKeys};
pub use registry::{LanguageConfig, LanguageRegistry, TextDirection};
pub use resolver::{
    interpolate, KeyResolver, Resolution, ResolutionSource, ResolveArgs, Variables,
};
pub use session::LanguageSession;
pub use state::{LanguageState, Subscription};
pub use strings::{builtin_common_words, CommonWordTable, CommonWords};
pub use sync::{ContextSynchronizer, LanguageUpdate, MicrotaskQueue, SyncState};
