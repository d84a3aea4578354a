//! Manually driven clock.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Clock whose time only moves when a test says so.
///
/// Clones share the same underlying time, so a clone handed to a limiter can
/// be advanced from the test body.
///
/// ```ignore
/// use worker_throttle::infrastructure::mocks::MockClock;
/// use worker_throttle::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::start();
/// let t0 = clock.now();
/// clock.advance(Duration::from_millis(250));
/// assert_eq!(clock.now() - t0, Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Create a clock frozen at the current instant.
    pub fn start() -> Self {
        Self::new(Instant::now())
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        *self.current.lock().expect("MockClock mutex poisoned") += by;
    }

    /// Move time backwards.
    ///
    /// Does nothing if the platform cannot represent the earlier instant.
    pub fn rewind(&self, by: Duration) {
        let mut now = self.current.lock().expect("MockClock mutex poisoned");
        if let Some(earlier) = now.checked_sub(by) {
            *now = earlier;
        }
    }

    /// Jump to a specific instant.
    pub fn set(&self, instant: Instant) {
        *self.current.lock().expect("MockClock mutex poisoned") = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.current.lock().expect("MockClock mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = MockClock::start();
        let shared = clock.clone();
        let t0 = clock.now();

        shared.advance(Duration::from_secs(3));
        assert_eq!(clock.now(), t0 + Duration::from_secs(3));

        clock.rewind(Duration::from_secs(1));
        assert_eq!(shared.now(), t0 + Duration::from_secs(2));

        clock.set(t0);
        assert_eq!(shared.now(), t0);
    }
}
