//! Admission policies for rate limiting.
//!
//! This module defines the core trait for admission policies and the sliding
//! trailing-window policy used by [`RateLimiter`](crate::RateLimiter) and
//! [`KeyedRateLimiter`](crate::KeyedRateLimiter).

use crate::domain::kind::ErrorKind;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Error returned when policy parameters are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The quota must admit at least one request per window
    #[error("max_requests must be greater than 0")]
    ZeroMaxRequests,
    /// The trailing window must have a non-zero length
    #[error("window duration must be greater than 0")]
    ZeroWindow,
}

impl PolicyError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Decision made by an admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The operation is admitted and has been recorded
    Admit,
    /// The operation is rejected; nothing was recorded
    Reject,
}

impl PolicyDecision {
    /// Check if this decision is Admit.
    pub fn is_admit(&self) -> bool {
        matches!(self, PolicyDecision::Admit)
    }

    /// Check if this decision is Reject.
    pub fn is_reject(&self) -> bool {
        matches!(self, PolicyDecision::Reject)
    }
}

/// Trait for implementing admission policies.
///
/// Policies decide whether an operation arriving at `timestamp` is admitted,
/// based on the operations they admitted before.
pub trait RateLimitPolicy: Send + Sync {
    /// Register an attempted operation and decide whether to admit it.
    ///
    /// Admitted operations are recorded; rejected ones leave the policy unchanged
    /// apart from expiring stale history.
    fn register(&mut self, timestamp: Instant) -> PolicyDecision;

    /// Number of operations that could still be admitted at `timestamp`.
    fn available(&mut self, timestamp: Instant) -> usize;

    /// Time until the next operation could be admitted, or `None` if one could
    /// be admitted right now.
    fn retry_after(&mut self, timestamp: Instant) -> Option<Duration>;

    /// Reset the policy state.
    fn reset(&mut self);
}

/// Sliding trailing-window policy.
///
/// Admits up to `max_requests` operations within any trailing window of
/// length `window`. A timestamp exactly `window` old still counts as inside
/// the window; it expires on the next tick.
///
/// # Example
/// ```
/// use worker_throttle::{SlidingWindowPolicy, RateLimitPolicy};
/// use std::time::{Duration, Instant};
///
/// let mut policy = SlidingWindowPolicy::new(2, Duration::from_secs(60)).unwrap();
/// let now = Instant::now();
///
/// assert!(policy.register(now).is_admit());
/// assert!(policy.register(now).is_admit());
/// assert!(policy.register(now).is_reject());
///
/// let after_window = now + Duration::from_secs(61);
/// assert!(policy.register(after_window).is_admit());
/// ```
#[derive(Debug, Clone)]
pub struct SlidingWindowPolicy {
    max_requests: usize,
    window: Duration,
    admitted: VecDeque<Instant>,
}

impl SlidingWindowPolicy {
    /// Create a new sliding-window policy.
    ///
    /// # Errors
    /// Returns `PolicyError::ZeroMaxRequests` if `max_requests` is zero and
    /// `PolicyError::ZeroWindow` if `window` is zero.
    pub fn new(max_requests: usize, window: Duration) -> Result<Self, PolicyError> {
        if max_requests == 0 {
            return Err(PolicyError::ZeroMaxRequests);
        }
        if window.is_zero() {
            return Err(PolicyError::ZeroWindow);
        }
        Ok(Self {
            max_requests,
            window,
            admitted: VecDeque::with_capacity(max_requests),
        })
    }

    /// Maximum admissions per window.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Length of the trailing window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of admitted timestamps currently retained.
    ///
    /// Stale entries are only dropped on the next call that takes a timestamp.
    pub fn recorded(&self) -> usize {
        self.admitted.len()
    }

    /// Drop every timestamp older than `now - window` in a single pass.
    ///
    /// Entries are not assumed to be sorted, so a clock that was moved
    /// backwards cannot leave expired entries behind a fresh one.
    fn expire(&mut self, now: Instant) {
        let window = self.window;
        self.admitted
            .retain(|&t| now.saturating_duration_since(t) <= window);
    }
}

impl RateLimitPolicy for SlidingWindowPolicy {
    fn register(&mut self, timestamp: Instant) -> PolicyDecision {
        self.expire(timestamp);

        if self.admitted.len() < self.max_requests {
            self.admitted.push_back(timestamp);
            PolicyDecision::Admit
        } else {
            PolicyDecision::Reject
        }
    }

    fn available(&mut self, timestamp: Instant) -> usize {
        self.expire(timestamp);
        self.max_requests - self.admitted.len()
    }

    fn retry_after(&mut self, timestamp: Instant) -> Option<Duration> {
        self.expire(timestamp);
        if self.admitted.len() < self.max_requests {
            return None;
        }

        // The oldest entry leaves the window one tick after it is `window` old.
        let oldest = self.admitted.iter().min().copied()?;
        let age = timestamp.saturating_duration_since(oldest);
        Some((self.window - age).saturating_add(Duration::from_nanos(1)))
    }

    fn reset(&mut self) {
        self.admitted.clear();
    }
}
