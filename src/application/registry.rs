//! Registry of per-key sliding windows.
//!
//! The registry owns one [`WindowState`] per [`LimitKey`], created lazily from
//! a template policy the first time a key is seen.

use crate::application::ports::{Clock, Storage};
use crate::domain::key::LimitKey;
use crate::domain::policy::{RateLimitPolicy, SlidingWindowPolicy};
use std::sync::Arc;
use std::time::Instant;

/// State tracked for each key.
#[derive(Debug, Clone)]
pub struct WindowState {
    /// Sliding window for this key
    pub policy: SlidingWindowPolicy,
    /// Last time this key was checked
    pub last_seen: Instant,
}

impl WindowState {
    /// Create fresh state from a template policy.
    pub fn new(policy: SlidingWindowPolicy, now: Instant) -> Self {
        Self {
            policy,
            last_seen: now,
        }
    }

    /// Check whether the window holds no unexpired admissions at `now`.
    pub fn is_idle(&mut self, now: Instant) -> bool {
        self.policy.available(now) == self.policy.max_requests()
    }
}

/// Registry managing per-key window state.
///
/// Generic over the storage backend; in production use
/// `Arc<ShardedStorage<LimitKey, WindowState>>`.
#[derive(Clone)]
pub struct WindowRegistry<S>
where
    S: Storage<LimitKey, WindowState> + Clone,
{
    storage: S,
    clock: Arc<dyn Clock>,
    template: SlidingWindowPolicy,
}

impl<S> WindowRegistry<S>
where
    S: Storage<LimitKey, WindowState> + Clone,
{
    /// Create a registry. Every new key starts from a fresh copy of `template`.
    pub fn new(storage: S, clock: Arc<dyn Clock>, mut template: SlidingWindowPolicy) -> Self {
        template.reset();
        Self {
            storage,
            clock,
            template,
        }
    }

    /// Access or create the window for `key`.
    ///
    /// The callback receives the state and the current timestamp and runs
    /// while the key's entry is locked.
    pub fn with_window<F, R>(&self, key: LimitKey, f: F) -> R
    where
        F: FnOnce(&mut WindowState, Instant) -> R,
    {
        let now = self.clock.now();
        let template = &self.template;
        self.storage.with_entry_mut(
            key,
            || WindowState::new(template.clone(), now),
            |state| {
                state.last_seen = now;
                f(state, now)
            },
        )
    }

    /// The policy every new key starts from.
    pub fn template(&self) -> &SlidingWindowPolicy {
        &self.template
    }

    /// Get the number of tracked keys.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Forget every key.
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Drop keys whose windows have fully expired. Returns how many were removed.
    pub fn cleanup_idle(&self) -> usize {
        let now = self.clock.now();
        let before = self.storage.len();
        self.storage.retain(|_, state| !state.is_idle(now));
        before.saturating_sub(self.storage.len())
    }
}
