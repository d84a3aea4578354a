//! Clock adapters.
//!
//! `SystemClock` reads the monotonic `Instant` clock. Tests use `MockClock`
//! from `crate::infrastructure::mocks` (available with the `test-helpers`
//! feature or in test builds).

use crate::application::ports::Clock;
use std::time::Instant;

/// Monotonic system clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
