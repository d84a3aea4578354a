//! Observability metrics for limiters and pools.
//!
//! All counters are atomics behind an `Arc`, so clones observe the same values
//! and can be handed to a metrics reporter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Admission statistics for a rate limiter.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    admitted: AtomicU64,
    rejected: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_admitted(&self) {
        self.inner.admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.inner.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Total admitted operations.
    pub fn admitted(&self) -> u64 {
        self.inner.admitted.load(Ordering::Relaxed)
    }

    /// Total rejected operations.
    pub fn rejected(&self) -> u64 {
        self.inner.rejected.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            admitted: self.admitted(),
            rejected: self.rejected(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inner.admitted.store(0, Ordering::Relaxed);
        self.inner.rejected.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time copy of limiter metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    /// Total admitted operations
    pub admitted: u64,
    /// Total rejected operations
    pub rejected: u64,
}

impl MetricsSnapshot {
    /// Ratio of rejected to total checks (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing was checked yet.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.rejected as f64 / total as f64
        }
    }

    /// Total admission checks.
    pub fn total(&self) -> u64 {
        self.admitted.saturating_add(self.rejected)
    }
}

/// Job statistics for a worker pool.
#[cfg(feature = "async")]
#[derive(Debug, Clone, Default)]
pub struct PoolMetrics {
    inner: Arc<PoolMetricsInner>,
}

#[cfg(feature = "async")]
#[derive(Debug, Default)]
struct PoolMetricsInner {
    submitted: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

#[cfg(feature = "async")]
impl PoolMetrics {
    /// Create a new pool metrics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submitted(&self) {
        self.inner.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_succeeded(&self) {
        self.inner.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Jobs accepted into the queue.
    pub fn submitted(&self) -> u64 {
        self.inner.submitted.load(Ordering::Relaxed)
    }

    /// Jobs whose processor returned a payload.
    pub fn succeeded(&self) -> u64 {
        self.inner.succeeded.load(Ordering::Relaxed)
    }

    /// Jobs whose processor failed or panicked.
    pub fn failed(&self) -> u64 {
        self.inner.failed.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all counters.
    pub fn snapshot(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            submitted: self.submitted(),
            succeeded: self.succeeded(),
            failed: self.failed(),
        }
    }
}

/// A point-in-time copy of pool metrics.
#[cfg(feature = "async")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolMetricsSnapshot {
    /// Jobs accepted into the queue
    pub submitted: u64,
    /// Jobs processed successfully
    pub succeeded: u64,
    /// Jobs that failed or panicked
    pub failed: u64,
}

#[cfg(feature = "async")]
impl PoolMetricsSnapshot {
    /// Jobs that have produced a result.
    pub fn completed(&self) -> u64 {
        self.succeeded.saturating_add(self.failed)
    }

    /// Jobs accepted but not yet finished (queued or running).
    pub fn pending(&self) -> u64 {
        self.submitted.saturating_sub(self.completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_metrics() {
        let metrics = Metrics::new();
        metrics.record_admitted();
        metrics.record_admitted();
        metrics.record_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.admitted, 2);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.total(), 3);

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_rejection_rate() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot().rejection_rate(), 0.0);

        metrics.record_admitted();
        metrics.record_rejected();
        metrics.record_rejected();
        metrics.record_rejected();
        assert!((metrics.snapshot().rejection_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let clone = metrics.clone();
        clone.record_admitted();
        assert_eq!(metrics.admitted(), 1);
    }

    #[cfg(feature = "async")]
    #[test]
    fn test_pool_metrics_pending() {
        let metrics = PoolMetrics::new();
        for _ in 0..5 {
            metrics.record_submitted();
        }
        metrics.record_succeeded();
        metrics.record_succeeded();
        metrics.record_failed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.completed(), 3);
        assert_eq!(snapshot.pending(), 2);
    }

    #[test]
    fn test_concurrent_updates() {
        use std::thread;

        let metrics = Metrics::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        m.record_admitted();
                        m.record_rejected();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.admitted(), 800);
        assert_eq!(metrics.rejected(), 800);
    }

    #[cfg(all(feature = "serde", feature = "async"))]
    #[test]
    fn test_snapshot_serializes() {
        let snapshot = PoolMetricsSnapshot {
            submitted: 3,
            succeeded: 2,
            failed: 1,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"submitted":3,"succeeded":2,"failed":1}"#);
        let back: PoolMetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
