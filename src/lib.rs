//! # worker-throttle
//!
//! Bounded async worker pools and sliding-window rate limiting.
//!
//! The crate provides two independent concurrency primitives:
//!
//! - [`WorkerPool`]: a fixed set of tokio workers draining a bounded job queue
//!   and publishing exactly one [`JobResult`] per job.
//! - [`RateLimiter`]: admits at most `max_requests` operations within any
//!   trailing window of time. [`KeyedRateLimiter`] keeps one window per key.
//!
//! A small expense [`Ledger`] shows the error handling conventions used
//! throughout the crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use worker_throttle::{Job, JobError, WorkerPool};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = WorkerPool::builder()
//!     .with_workers(3)
//!     .with_queue_capacity(16)
//!     .with_processor(|job: &Job| {
//!         if job.payload().is_empty() {
//!             return Err(JobError::failed("empty payload"));
//!         }
//!         Ok(job.payload().chars().rev().collect::<String>())
//!     })
//!     .build()?;
//!
//! let mut results = pool.results()?;
//! for id in 0..10 {
//!     pool.submit(Job::new(id, format!("payload {id}"))).await?;
//! }
//! pool.close().await?;
//!
//! while let Some(result) = results.next().await {
//!     println!("{} on worker {}: {:?}", result.job_id, result.worker, result.outcome);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Rate Limiting
//!
//! ```rust
//! use std::time::Duration;
//! use worker_throttle::RateLimiter;
//!
//! let limiter = RateLimiter::new(5, Duration::from_secs(1)).unwrap();
//! let admitted = (0..10).filter(|_| limiter.allow()).count();
//! assert_eq!(admitted, 5);
//!
//! // The rejection carries the time until a slot frees up.
//! let err = limiter.try_acquire().unwrap_err();
//! assert!(err.retry_after() > Duration::ZERO);
//! ```
//!
//! A timestamp exactly `window` old still counts against the quota; it
//! expires one tick later.
//!
//! ## Pool Lifecycle
//!
//! - `submit` waits while the queue is full. `try_submit` never waits and hands
//!   the job back in [`PoolError::QueueFull`]. `submit_with_cancel` gives up
//!   when a `CancellationToken` fires.
//! - `close` stops intake, waits for every queued job to finish and returns
//!   once all workers have exited. The [`ResultStream`] then ends.
//! - A panicking processor does not kill its worker. The job yields
//!   [`JobError::Panicked`] and the worker moves on.
//!
//! ## Observability
//!
//! Both primitives keep atomic counters:
//!
//! ```rust
//! # use std::time::Duration;
//! # use worker_throttle::RateLimiter;
//! # let limiter = RateLimiter::new(5, Duration::from_secs(1)).unwrap();
//! let snapshot = limiter.metrics().snapshot();
//! println!("Rejection rate: {:.2}%", snapshot.rejection_rate() * 100.0);
//! ```
//!
//! Diagnostics go through `tracing`: worker start and exit at `debug`, failed
//! jobs at `warn`, pool shutdown at `info`. Install any subscriber to see them.
//!
//! ## Features
//!
//! - `async` (default): the tokio worker pool
//! - `serde`: `Serialize`/`Deserialize` for configs and metric snapshots
//! - `test-helpers`: `MockClock` and `MockCaptureLayer` for downstream tests
//!
//! ## Errors
//!
//! Every error type exposes `kind()` returning an [`ErrorKind`], so callers can
//! tell invalid input from exhausted capacity or a closed component without
//! matching individual variants.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - concrete adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    job::{Job, JobError, JobId, JobResult},
    key::LimitKey,
    kind::ErrorKind,
    ledger::{Account, Expense, Ledger, LedgerError},
    policy::{PolicyDecision, PolicyError, RateLimitPolicy, SlidingWindowPolicy},
};

pub use application::{
    limiter::{
        Admission, DefaultKeyStorage, KeyedRateLimiter, LimitConfig, RateLimitError, RateLimiter,
    },
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, JobProcessor, Storage},
    registry::{WindowRegistry, WindowState},
};

#[cfg(feature = "async")]
pub use application::metrics::{PoolMetrics, PoolMetricsSnapshot};

#[cfg(feature = "async")]
pub use application::pool::{
    BuildError, PoolError, ResultStream, WorkerPool, WorkerPoolBuilder, WorkerPoolConfig,
};

#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;

pub use infrastructure::{clock::SystemClock, processor::UppercaseProcessor, storage::ShardedStorage};
