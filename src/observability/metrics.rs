//! Metrics registry
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
///
/// Relaxed ordering throughout; values are exact once traffic quiesces.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    forms_created: AtomicU64,
    submissions_accepted: AtomicU64,
    submissions_rejected: AtomicU64,
    broadcasts_delivered: AtomicU64,
    broadcasts_dropped: AtomicU64,
    subscribers_connected: AtomicU64,
    reports_generated: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_forms_created(&self) {
        self.forms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submissions_accepted(&self) {
        self.submissions_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_submissions_rejected(&self) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one publish
    pub fn add_broadcasts(&self, delivered: u64, dropped: u64) {
        self.broadcasts_delivered.fetch_add(delivered, Ordering::Relaxed);
        self.broadcasts_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    pub fn increment_subscribers_connected(&self) {
        self.subscribers_connected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reports_generated(&self) {
        self.reports_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            forms_created: self.forms_created.load(Ordering::Relaxed),
            submissions_accepted: self.submissions_accepted.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
            broadcasts_delivered: self.broadcasts_delivered.load(Ordering::Relaxed),
            broadcasts_dropped: self.broadcasts_dropped.load(Ordering::Relaxed),
            subscribers_connected: self.subscribers_connected.load(Ordering::Relaxed),
            reports_generated: self.reports_generated.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub forms_created: u64,
    pub submissions_accepted: u64,
    pub submissions_rejected: u64,
    pub broadcasts_delivered: u64,
    pub broadcasts_dropped: u64,
    pub subscribers_connected: u64,
    pub reports_generated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_forms_created();
        registry.increment_submissions_accepted();
        registry.increment_submissions_accepted();
        registry.increment_submissions_rejected();
        registry.add_broadcasts(3, 1);
        registry.increment_subscribers_connected();
        registry.increment_reports_generated();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.forms_created, 1);
        assert_eq!(snapshot.submissions_accepted, 2);
        assert_eq!(snapshot.submissions_rejected, 1);
        assert_eq!(snapshot.broadcasts_delivered, 3);
        assert_eq!(snapshot.broadcasts_dropped, 1);
        assert_eq!(snapshot.subscribers_connected, 1);
        assert_eq!(snapshot.reports_generated, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_submissions_accepted();

        let parsed = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(parsed["submissions_accepted"], 1);
        assert_eq!(parsed["reports_generated"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_submissions_accepted();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().submissions_accepted, 800);
    }
}
