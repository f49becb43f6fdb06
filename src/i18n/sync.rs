//! Reconciliation between the local and process-wide language containers.
//!
//! Two providers each hold a `LanguageState`. Consumers may write to either
//! one directly, so the two can disagree for a moment. The synchronizer
//! exposes the process-wide value as the effective language and, when it
//! notices a disagreement during a read, queues a microtask that copies the
//! process-wide value into the local container. Reads never write.
//!
//! `set_language` updates both containers before it returns.

use crate::i18n::{Language, LanguageState};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

type Task = Box<dyn FnOnce()>;

/// Deferred work run after the current update cycle.
///
/// The host drains the queue with `run_until_idle` once its update cycle
/// finishes and before it renders.
#[derive(Clone, Default)]
pub struct MicrotaskQueue {
    tasks: Rc<RefCell<VecDeque<Task>>>,
}

impl fmt::Debug for MicrotaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrotaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

impl MicrotaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&self, task: impl FnOnce() + 'static) {
        self.tasks.borrow_mut().push_back(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Run queued tasks, including ones queued while draining, until the
    /// queue is empty. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            // Pop before running so a task may schedule more work.
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

/// Agreement between the two containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Converged,
    Diverged,
}

/// A language change: a literal value or a function of the previous one.
pub enum LanguageUpdate {
    Set(Language),
    Update(Box<dyn FnOnce(Language) -> Language>),
}

impl LanguageUpdate {
    /// Build an update from a function of the current effective language.
    pub fn with(f: impl FnOnce(Language) -> Language + 'static) -> Self {
        LanguageUpdate::Update(Box::new(f))
    }

    pub fn apply(self, previous: Language) -> Language {
        match self {
            LanguageUpdate::Set(language) => language,
            LanguageUpdate::Update(f) => f(previous),
        }
    }
}

impl From<Language> for LanguageUpdate {
    fn from(language: Language) -> Self {
        LanguageUpdate::Set(language)
    }
}

impl fmt::Debug for LanguageUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageUpdate::Set(language) => f.debug_tuple("Set").field(language).finish(),
            LanguageUpdate::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// Keeps a local and a process-wide language container in agreement.
#[derive(Debug)]
pub struct ContextSynchronizer {
    local: LanguageState,
    global: LanguageState,
    queue: MicrotaskQueue,
    reconcile_pending: Rc<Cell<bool>>,
}

impl ContextSynchronizer {
    pub fn new(local: LanguageState, global: LanguageState, queue: MicrotaskQueue) -> Self {
        Self {
            local,
            global,
            queue,
            reconcile_pending: Rc::new(Cell::new(false)),
        }
    }

    pub fn local(&self) -> &LanguageState {
        &self.local
    }

    pub fn global(&self) -> &LanguageState {
        &self.global
    }

    pub fn queue(&self) -> &MicrotaskQueue {
        &self.queue
    }

    pub fn state(&self) -> SyncState {
        if self.local.get() == self.global.get() {
            SyncState::Converged
        } else {
            SyncState::Diverged
        }
    }

    /// The effective language.
    ///
    /// If the containers disagree, a reconcile task is queued (at most one at
    /// a time) and the process-wide value is returned immediately.
    pub fn read(&self) -> Language {
        let effective = self.global.get();

        if self.local.get() != effective && !self.reconcile_pending.replace(true) {
            let local = self.local.clone();
            let global = self.global.clone();
            let pending = Rc::clone(&self.reconcile_pending);

            self.queue.schedule(move || {
                pending.set(false);
                let target = global.get();
                if local.set(target) {
                    debug!("Reconciled {} language to '{}'", local.name(), target);
                }
            });
        }

        effective
    }

    /// Change the language in both containers.
    ///
    /// Function updates receive the current effective language. Returns the
    /// new language.
    pub fn set_language(&self, update: impl Into<LanguageUpdate>) -> Language {
        let next = update.into().apply(self.global.get());

        self.local.set(next);
        if self.global.set(next) {
            info!("Language changed to '{}'", next);
        }

        next
    }
}
