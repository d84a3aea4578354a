use proptest::prelude::*;
use std::time::{Duration, Instant};
use worker_throttle::{RateLimitPolicy, SlidingWindowPolicy};

proptest! {
    /// Replays random call times against a brute-force model: a call is
    /// admitted exactly when fewer than `max` admissions are at most `window`
    /// old, and no closed trailing window ever holds more than `max`.
    #[test]
    fn admissions_never_exceed_limit(
        max in 1usize..8,
        window_ms in 1u64..200,
        mut offsets in prop::collection::vec(0u64..2_000, 1..200),
    ) {
        offsets.sort_unstable();
        let window = Duration::from_millis(window_ms);
        let mut policy = SlidingWindowPolicy::new(max, window).unwrap();
        let start = Instant::now();

        let mut admitted: Vec<u64> = Vec::new();
        for &offset in &offsets {
            let in_window = admitted
                .iter()
                .filter(|&&t| offset - t <= window_ms)
                .count();
            let decision = policy.register(start + Duration::from_millis(offset));
            prop_assert_eq!(decision.is_admit(), in_window < max);
            if decision.is_admit() {
                admitted.push(offset);
            }
        }

        for &t in &admitted {
            let count = admitted
                .iter()
                .filter(|&&s| s <= t && t - s <= window_ms)
                .count();
            prop_assert!(count <= max);
        }
    }

    #[test]
    fn available_matches_recorded(
        max in 1usize..8,
        offsets in prop::collection::vec(0u64..50, 0..40),
    ) {
        let mut policy = SlidingWindowPolicy::new(max, Duration::from_secs(1)).unwrap();
        let start = Instant::now();
        let mut elapsed = 0;
        for step in offsets {
            elapsed += step;
            let now = start + Duration::from_millis(elapsed);
            policy.register(now);
            prop_assert_eq!(policy.available(now), max - policy.recorded());
        }
    }
}
