//! Observable "current language" container.
//!
//! Each UI provider owns one `LanguageState`. Clones are handles to the same
//! value. Setting a different language bumps the version, records the change
//! time and notifies subscribers in registration order.
//!
//! Subscribers are held weakly; dropping the returned `Subscription`
//! unsubscribes. Callbacks run after the state's borrow is released, so a
//! callback may call `set` on the same state. That nested change notifies
//! every subscriber again before the outer `set` returns.

use crate::i18n::Language;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn(Language)>;
type WeakCallback = Weak<dyn Fn(Language)>;

struct StateInner {
    language: Language,
    version: u64,
    changed_at: DateTime<Utc>,
    subscribers: Vec<WeakCallback>,
}

/// Shared, version-tracked language value with change notification.
#[derive(Clone)]
pub struct LanguageState {
    name: &'static str,
    inner: Rc<RefCell<StateInner>>,
}

impl fmt::Debug for LanguageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("LanguageState")
            .field("name", &self.name)
            .field("language", &inner.language)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl LanguageState {
    /// Create a container. `name` only appears in logs and `Debug` output.
    pub fn new(name: &'static str, language: Language) -> Self {
        Self {
            name,
            inner: Rc::new(RefCell::new(StateInner {
                language,
                version: 0,
                changed_at: Utc::now(),
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> Language {
        self.inner.borrow().language
    }

    /// Set the language. Returns `false` (and notifies nobody) when it is
    /// already the current value.
    pub fn set(&self, language: Language) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.language == language {
                return false;
            }
            inner.language = language;
            inner.version += 1;
            inner.changed_at = Utc::now();
        }
        self.notify(language);
        true
    }

    /// Set the language from a function of the current one.
    pub fn update(&self, f: impl FnOnce(Language) -> Language) -> bool {
        let next = f(self.get());
        self.set(next)
    }

    /// Register a change callback.
    pub fn subscribe(&self, callback: impl Fn(Language) + 'static) -> Subscription {
        let strong: Callback = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription { _callback: strong }
    }

    /// Number of value-changing writes so far.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// When the language last changed (creation time if never).
    pub fn changed_at(&self) -> DateTime<Utc> {
        self.inner.borrow().changed_at
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self, language: Language) {
        let callbacks: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            inner.subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for callback in &callbacks {
            callback(language);
        }
    }
}

/// Keeps a subscriber alive; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes the callback"]
pub struct Subscription {
    _callback: Callback,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
