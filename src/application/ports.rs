//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::job::{Job, JobError};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

/// Port for obtaining current time.
///
/// This abstraction allows the limiters to work with time without depending
/// on the system clock. Infrastructure provides concrete implementations
/// (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for the work a pool worker performs on each job.
///
/// Implementations must be deterministic with respect to the job. Each call
/// runs on tokio's blocking thread pool, so blocking or CPU-heavy work does
/// not stall the async runtime. A panic inside
/// `process` is caught and reported as [`JobError::Panicked`].
///
/// Any `Fn(&Job) -> Result<String, JobError>` closure is a processor.
pub trait JobProcessor: Send + Sync + 'static {
    /// Derive the result payload for one job.
    fn process(&self, job: &Job) -> Result<String, JobError>;
}

impl<F> JobProcessor for F
where
    F: Fn(&Job) -> Result<String, JobError> + Send + Sync + 'static,
{
    fn process(&self, job: &Job) -> Result<String, JobError> {
        self(job)
    }
}

/// Port for concurrent key-value storage.
///
/// This abstraction allows the keyed limiter to store per-key state without
/// depending on a specific concurrent map. Infrastructure provides
/// `ShardedStorage`.
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// The entry stays locked for the duration of `accessor`.
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;

    /// Clear all entries from the storage.
    fn clear(&self);

    /// Remove entries for which the predicate returns false.
    fn retain<F>(&self, f: F)
    where
        F: FnMut(&K, &mut V) -> bool;
}
