//! Translation session: the call surface used by UI code.
//!
//! A session wires the pieces together for one UI lifetime: it seeds the
//! language from the preference store, keeps both language containers in
//! sync, persists every effective change, mirrors it onto the document root
//! and resolves keys with the effective language.

use crate::i18n::{
    AuditReport, Catalog, CompletenessAuditor, ContextSynchronizer, DirectionalityManager,
    DocumentAttributes, DocumentRoot, KeyResolver, Language, LanguageState, LanguageUpdate,
    MetricsReport, MicrotaskQueue, PreferenceStore, ResolutionMetrics, ResolveArgs, Subscription,
    TextDirection,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{info, warn};

pub struct LanguageSession<D: DocumentRoot + 'static = DocumentAttributes> {
    resolver: KeyResolver,
    preferences: Rc<PreferenceStore>,
    document: Rc<RefCell<D>>,
    direction_stale: Rc<Cell<bool>>,
    sync: ContextSynchronizer,
    metrics: ResolutionMetrics,
    _on_change: Subscription,
}

impl<D: DocumentRoot + 'static> LanguageSession<D> {
    /// Start a session.
    ///
    /// The initial language comes from `PreferenceStore::load` with the
    /// given browser locale guess. It is persisted and applied to the
    /// document before this returns.
    pub fn start(
        catalog: Arc<Catalog>,
        preferences: PreferenceStore,
        document: D,
        queue: MicrotaskQueue,
        browser_guess: Option<&str>,
    ) -> Self {
        let default_language = preferences.default_language();
        let initial = preferences.load(browser_guess);
        preferences.save(initial);

        let document = Rc::new(RefCell::new(document));
        DirectionalityManager::new().apply(&mut *document.borrow_mut(), initial);

        let local = LanguageState::new("local", initial);
        let global = LanguageState::new("global", initial);
        let preferences = Rc::new(preferences);
        let direction_stale = Rc::new(Cell::new(false));

        let on_change = {
            let preferences = Rc::clone(&preferences);
            let document = Rc::clone(&document);
            let direction_stale = Rc::clone(&direction_stale);
            global.subscribe(move |language| {
                preferences.save(language);
                match document.try_borrow_mut() {
                    Ok(mut document) => {
                        DirectionalityManager::new().apply(&mut *document, language);
                        direction_stale.set(false);
                    }
                    Err(_) => {
                        warn!(
                            "Document busy, deferring dir/lang for '{}' until it is released",
                            language
                        );
                        direction_stale.set(true);
                    }
                }
            })
        };

        info!("Language session started in '{}'", initial);

        Self {
            resolver: KeyResolver::new(catalog, default_language),
            preferences,
            document,
            direction_stale,
            sync: ContextSynchronizer::new(local, global, queue),
            metrics: ResolutionMetrics::new(),
            _on_change: on_change,
        }
    }

    /// The effective language.
    pub fn language(&self) -> Language {
        self.sync.read()
    }

    pub fn direction(&self) -> TextDirection {
        self.language().direction()
    }

    /// Change the language everywhere: both containers, the persisted
    /// preference and the document attributes are updated before this
    /// returns. Called from inside `with_document`, the attributes follow
    /// when that closure returns.
    pub fn set_language(&self, update: impl Into<LanguageUpdate>) -> Language {
        self.sync.set_language(update)
    }

    /// Change the language from a raw code; unsupported codes select the
    /// default language.
    pub fn set_language_code(&self, code: &str) -> Language {
        let default_language = self.resolver.default_language();
        let language = Language::from_code(code).unwrap_or_else(|_| {
            warn!(
                "Unsupported language '{}' requested, using '{}'",
                code, default_language
            );
            default_language
        });
        self.set_language(language)
    }

    /// Translate a key in the effective language.
    ///
    /// `args` may be `()`, a default value, `&Variables`, or both as a tuple.
    pub fn t<'a>(&self, key: &'a str, args: impl ResolveArgs<'a>) -> String {
        let (default_value, variables) = args.into_parts();
        let resolution =
            self.resolver
                .resolve_detailed(key, self.language(), default_value, variables);
        self.metrics.record(resolution.source);
        resolution.text
    }

    /// A common word in the effective language, or the word itself.
    pub fn common_word(&self, word: &str) -> String {
        self.resolver
            .catalog()
            .common_word(self.language(), word)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(word)
            .to_string()
    }

    /// Supported languages with their native names, in selector order.
    pub fn supported_languages(&self) -> Vec<(Language, &'static str)> {
        Language::all()
            .into_iter()
            .map(|language| (language, language.native_name()))
            .collect()
    }

    /// Audit the session's catalog.
    pub fn audit(&self) -> AuditReport {
        CompletenessAuditor::audit(self.resolver.catalog())
    }

    pub fn metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Drain deferred reconcile work. Call once per update cycle.
    pub fn run_pending(&self) -> usize {
        self.sync.queue().run_until_idle()
    }

    pub fn synchronizer(&self) -> &ContextSynchronizer {
        &self.sync
    }

    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Current value of a document root attribute.
    pub fn document_attribute(&self, name: &str) -> Option<String> {
        self.document.borrow().attribute(name).map(str::to_string)
    }

    /// Run `f` with the document root.
    ///
    /// A language change made inside `f` is saved immediately; its `dir` and
    /// `lang` attributes are applied once `f` returns.
    pub fn with_document<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let result = {
            let document = self.document.borrow();
            f(&*document)
        };

        if self.direction_stale.replace(false) {
            let language = self.sync.global().get();
            DirectionalityManager::new().apply(&mut *self.document.borrow_mut(), language);
        }

        result
    }
}
