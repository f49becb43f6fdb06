//! Resolution metrics and observability.
//!
//! Counts which step of the fallback chain answered each translation call.
//! A high reference-fallback rate for a language usually means its tables are
//! behind; the audit report says which keys.

use crate::i18n::ResolutionSource;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolution outcome counters for one session.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Resolved in the requested language
    requested: AtomicUsize,

    /// Fell back to the reference language
    reference_fallbacks: AtomicUsize,

    /// Fell back to the caller's default value
    default_fallbacks: AtomicUsize,

    /// Nothing matched; the key was shown
    key_fallbacks: AtomicUsize,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one resolution.
    pub fn record(&self, source: ResolutionSource) {
        let counter = match source {
            ResolutionSource::Requested => &self.requested,
            ResolutionSource::Reference => &self.reference_fallbacks,
            ResolutionSource::DefaultValue => &self.default_fallbacks,
            ResolutionSource::Key => &self.key_fallbacks,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requested(&self) -> usize {
        self.requested.load(Ordering::Relaxed)
    }

    pub fn reference_fallbacks(&self) -> usize {
        self.reference_fallbacks.load(Ordering::Relaxed)
    }

    pub fn default_fallbacks(&self) -> usize {
        self.default_fallbacks.load(Ordering::Relaxed)
    }

    pub fn key_fallbacks(&self) -> usize {
        self.key_fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let requested = self.requested();
        let reference_fallbacks = self.reference_fallbacks();
        let default_fallbacks = self.default_fallbacks();
        let key_fallbacks = self.key_fallbacks();
        let total = requested + reference_fallbacks + default_fallbacks + key_fallbacks;

        let hit_rate = if total > 0 {
            (requested as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            total,
            requested,
            reference_fallbacks,
            default_fallbacks,
            key_fallbacks,
            hit_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.requested.store(0, Ordering::Relaxed);
        self.reference_fallbacks.store(0, Ordering::Relaxed);
        self.default_fallbacks.store(0, Ordering::Relaxed);
        self.key_fallbacks.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of resolution statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    /// Number of resolutions recorded
    pub total: usize,

    pub requested: usize,
    pub reference_fallbacks: usize,
    pub default_fallbacks: usize,
    pub key_fallbacks: usize,

    /// Share resolved in the requested language as a percentage (0-100)
    pub hit_rate: f64,
}
