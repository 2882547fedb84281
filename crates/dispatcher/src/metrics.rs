//! Notifier metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by a notifier and its workers
#[derive(Debug, Default)]
pub struct NotifierMetrics {
    /// Messages answered with 200
    delivered_count: AtomicU64,
    /// Messages that failed delivery
    failed_count: AtomicU64,
    /// Messages abandoned on cancellation
    cancelled_count: AtomicU64,
    /// Messages dropped from the error queue at stop
    discarded_errors: AtomicU64,
}

impl NotifierMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    pub fn inc_delivered_count(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    pub fn inc_failed_count(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled_count.load(Ordering::Relaxed)
    }

    pub fn add_cancelled_count(&self, count: u64) {
        self.cancelled_count.fetch_add(count, Ordering::Relaxed);
    }

    pub fn discarded_errors(&self) -> u64 {
        self.discarded_errors.load(Ordering::Relaxed)
    }

    pub fn add_discarded_errors(&self, count: u64) {
        self.discarded_errors.fetch_add(count, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            delivered_count: self.delivered_count(),
            failed_count: self.failed_count(),
            cancelled_count: self.cancelled_count(),
            discarded_errors: self.discarded_errors(),
        }
    }
}

/// Snapshot of notifier metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub delivered_count: u64,
    pub failed_count: u64,
    pub cancelled_count: u64,
    pub discarded_errors: u64,
}
