//! Sliding-window rate limiting example.
//!
//! Shows a single shared window and a keyed limiter with one window per client.

use std::time::Duration;
use worker_throttle::{KeyedRateLimiter, RateLimiter, SlidingWindowPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sliding Window Example ===\n");
    println!("Policy: at most 5 requests per second\n");

    let limiter = RateLimiter::new(5, Duration::from_secs(1))?;
    for i in 1..=10 {
        let admission = limiter.check();
        if admission.is_admitted() {
            println!("request {i:>2}: allowed ({} left)", admission.remaining);
        } else if let Some(wait) = admission.retry_after {
            println!("request {i:>2}: rejected, retry in {wait:?}");
        }
    }

    println!("\nWaiting for the window to slide...");
    std::thread::sleep(Duration::from_millis(1_050));
    println!("after 1s: allowed = {}", limiter.allow());

    println!("\n=== Per-client limits ===\n");
    let keyed = KeyedRateLimiter::new(SlidingWindowPolicy::new(2, Duration::from_secs(1))?);
    for client in ["alice", "alice", "alice", "bob", "bob", "carol"] {
        println!("{client:>5}: allowed = {}", keyed.allow(client));
    }

    let snapshot = keyed.metrics().snapshot();
    println!(
        "\n{} keys tracked, rejection rate {:.0}%",
        keyed.tracked_keys(),
        snapshot.rejection_rate() * 100.0
    );
    Ok(())
}
