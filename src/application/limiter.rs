//! Rate limiter coordination logic.
//!
//! [`RateLimiter`] guards a single sliding window with one mutex: every
//! admission check expires stale timestamps, compares against the quota and
//! records the admission in one critical section, so concurrent callers can
//! never push the window past `max_requests`.
//!
//! [`KeyedRateLimiter`] applies the same policy independently per key.

use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, Storage};
use crate::application::registry::{WindowRegistry, WindowState};
use crate::domain::key::LimitKey;
use crate::domain::kind::ErrorKind;
use crate::domain::policy::{PolicyDecision, PolicyError, RateLimitPolicy, SlidingWindowPolicy};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::storage::ShardedStorage;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Error returned by [`RateLimiter::try_acquire`] when the quota is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// No capacity left in the current window
    #[error("rate limit exceeded, retry after {retry_after:?}")]
    Exhausted {
        /// Time until the oldest admission leaves the window
        retry_after: Duration,
    },
}

impl RateLimitError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ResourceExhausted
    }

    /// Time until a retry could succeed.
    pub fn retry_after(&self) -> Duration {
        match self {
            RateLimitError::Exhausted { retry_after } => *retry_after,
        }
    }
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the operation was admitted
    pub decision: PolicyDecision,
    /// Capacity left in the window after this check
    pub remaining: usize,
    /// Time until capacity frees up, when the window is full
    pub retry_after: Option<Duration>,
}

impl Admission {
    /// Check if the operation was admitted.
    pub fn is_admitted(&self) -> bool {
        self.decision.is_admit()
    }

    fn into_result(self) -> Result<(), RateLimitError> {
        match self.decision {
            PolicyDecision::Admit => Ok(()),
            PolicyDecision::Reject => Err(RateLimitError::Exhausted {
                retry_after: self.retry_after.unwrap_or_default(),
            }),
        }
    }
}

/// Quota settings for a limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitConfig {
    /// Maximum admissions per window
    pub max_requests: usize,
    /// Length of the trailing window
    pub window: Duration,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(1),
        }
    }
}

impl LimitConfig {
    /// Set the maximum admissions per window.
    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Set the window length.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Validate the settings and build a policy.
    pub fn into_policy(self) -> Result<SlidingWindowPolicy, PolicyError> {
        SlidingWindowPolicy::new(self.max_requests, self.window)
    }
}

fn check_policy(policy: &mut SlidingWindowPolicy, now: std::time::Instant) -> Admission {
    let decision = policy.register(now);
    Admission {
        decision,
        remaining: policy.available(now),
        retry_after: policy.retry_after(now),
    }
}

/// Sliding-window rate limiter with a single lock.
///
/// Clones share the same window and metrics.
///
/// # Example
/// ```
/// use worker_throttle::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::new(5, Duration::from_secs(1)).unwrap();
/// let admitted = (0..10).filter(|_| limiter.allow()).count();
/// assert_eq!(admitted, 5);
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    policy: Arc<Mutex<SlidingWindowPolicy>>,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `window`, on the system clock.
    ///
    /// # Errors
    /// Returns a `PolicyError` if either parameter is zero.
    pub fn new(max_requests: usize, window: Duration) -> Result<Self, PolicyError> {
        let policy = SlidingWindowPolicy::new(max_requests, window)?;
        Ok(Self::with_clock(policy, Arc::new(SystemClock::new())))
    }

    /// Create a limiter from a policy and a clock.
    pub fn with_clock(mut policy: SlidingWindowPolicy, clock: Arc<dyn Clock>) -> Self {
        policy.reset();
        Self {
            policy: Arc::new(Mutex::new(policy)),
            clock,
            metrics: Metrics::new(),
        }
    }

    /// Create a limiter from configuration.
    pub fn from_config(config: &LimitConfig, clock: Arc<dyn Clock>) -> Result<Self, PolicyError> {
        let policy = config.into_policy()?;
        Ok(Self::with_clock(policy, clock))
    }

    // The policy is never left half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, SlidingWindowPolicy> {
        self.policy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide whether one operation may proceed now, recording it if so.
    pub fn allow(&self) -> bool {
        self.check().is_admitted()
    }

    /// Like [`allow`](Self::allow), but returns the full admission outcome.
    pub fn check(&self) -> Admission {
        let admission = {
            let mut policy = self.lock();
            let now = self.clock.now();
            check_policy(&mut policy, now)
        };

        match admission.decision {
            PolicyDecision::Admit => self.metrics.record_admitted(),
            PolicyDecision::Reject => {
                self.metrics.record_rejected();
                tracing::debug!(
                    retry_after_ms = admission
                        .retry_after
                        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
                    "rate limit rejected operation"
                );
            }
        }
        admission
    }

    /// Like [`allow`](Self::allow), as a `Result`.
    ///
    /// # Errors
    /// `RateLimitError::Exhausted` with the time until capacity frees up.
    pub fn try_acquire(&self) -> Result<(), RateLimitError> {
        self.check().into_result()
    }

    /// Capacity left in the current window, without recording anything.
    pub fn available(&self) -> usize {
        let mut policy = self.lock();
        let now = self.clock.now();
        policy.available(now)
    }

    /// Forget every recorded admission.
    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Maximum admissions per window.
    pub fn max_requests(&self) -> usize {
        self.lock().max_requests()
    }

    /// Length of the trailing window.
    pub fn window(&self) -> Duration {
        self.lock().window()
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Default storage for [`KeyedRateLimiter`].
pub type DefaultKeyStorage = Arc<ShardedStorage<LimitKey, WindowState>>;

/// Rate limiter with an independent sliding window per key.
///
/// Each key gets its own quota; the map shards its locks so unrelated keys
/// rarely contend.
///
/// # Example
/// ```
/// use worker_throttle::{KeyedRateLimiter, SlidingWindowPolicy};
/// use std::time::Duration;
///
/// let policy = SlidingWindowPolicy::new(1, Duration::from_secs(60)).unwrap();
/// let limiter = KeyedRateLimiter::new(policy);
///
/// assert!(limiter.allow("alice"));
/// assert!(!limiter.allow("alice"));
/// assert!(limiter.allow("bob"));
/// ```
#[derive(Clone)]
pub struct KeyedRateLimiter<S = DefaultKeyStorage>
where
    S: Storage<LimitKey, WindowState> + Clone,
{
    registry: WindowRegistry<S>,
    metrics: Metrics,
}

impl KeyedRateLimiter<DefaultKeyStorage> {
    /// Create a keyed limiter on the system clock.
    pub fn new(policy: SlidingWindowPolicy) -> Self {
        Self::with_clock(policy, Arc::new(SystemClock::new()))
    }

    /// Create a keyed limiter with a custom clock.
    pub fn with_clock(policy: SlidingWindowPolicy, clock: Arc<dyn Clock>) -> Self {
        Self::with_storage(Arc::new(ShardedStorage::new()), policy, clock)
    }
}

impl<S> KeyedRateLimiter<S>
where
    S: Storage<LimitKey, WindowState> + Clone,
{
    /// Create a keyed limiter over a custom storage backend.
    pub fn with_storage(storage: S, policy: SlidingWindowPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: WindowRegistry::new(storage, clock, policy),
            metrics: Metrics::new(),
        }
    }

    /// Decide whether one operation for `key` may proceed now.
    pub fn allow(&self, key: impl Into<LimitKey>) -> bool {
        self.check(key).is_admitted()
    }

    /// Like [`allow`](Self::allow), but returns the full admission outcome.
    pub fn check(&self, key: impl Into<LimitKey>) -> Admission {
        let key = key.into();
        let admission = self
            .registry
            .with_window(key, |state, now| check_policy(&mut state.policy, now));

        match admission.decision {
            PolicyDecision::Admit => self.metrics.record_admitted(),
            PolicyDecision::Reject => {
                self.metrics.record_rejected();
                tracing::debug!(%key, "rate limit rejected operation for key");
            }
        }
        admission
    }

    /// Like [`allow`](Self::allow), as a `Result`.
    pub fn try_acquire(&self, key: impl Into<LimitKey>) -> Result<(), RateLimitError> {
        self.check(key).into_result()
    }

    /// Capacity left for `key`. Starts tracking the key if it was unknown.
    pub fn available(&self, key: impl Into<LimitKey>) -> usize {
        self.registry
            .with_window(key.into(), |state, now| state.policy.available(now))
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.registry.len()
    }

    /// Drop keys whose windows have fully expired. Returns how many were removed.
    pub fn cleanup_idle(&self) -> usize {
        let removed = self.registry.cleanup_idle();
        if removed > 0 {
            tracing::trace!(removed, "dropped idle rate limit keys");
        }
        removed
    }

    /// Forget every key.
    pub fn clear(&self) {
        self.registry.clear();
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
