//! Worker pool example feeding jobs through three workers.
//!
//! Jobs are throttled by a rate limiter before submission; one payload makes
//! the processor fail so the failure shows up in the logs and the results.

use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use worker_throttle::{Job, JobError, RateLimiter, WorkerPool};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(LevelFilter::DEBUG)
        .init();

    println!("=== Worker Pool Example ===\n");

    let pool = WorkerPool::builder()
        .with_workers(3)
        .with_queue_capacity(4)
        .with_processor(|job: &Job| {
            if job.payload().contains("bad") {
                return Err(JobError::failed("payload rejected"));
            }
            Ok(job.payload().to_uppercase())
        })
        .build()?;

    let mut results = pool.results()?;
    let consumer = tokio::spawn(async move {
        let mut count = 0;
        while let Some(result) = results.next().await {
            match &result.outcome {
                Ok(output) => println!("{} (worker {}): {}", result.job_id, result.worker, output),
                Err(err) => println!("{} (worker {}): {}", result.job_id, result.worker, err),
            }
            count += 1;
        }
        count
    });

    // At most 5 submissions per 100ms.
    let limiter = RateLimiter::new(5, Duration::from_millis(100))?;
    for id in 0..10 {
        while let Err(err) = limiter.try_acquire() {
            tokio::time::sleep(err.retry_after()).await;
        }
        let payload = if id == 6 { "bad input".to_string() } else { format!("job number {id}") };
        pool.submit(Job::new(id, payload)).await?;
    }

    pool.close().await?;
    let received = consumer.await?;

    let snapshot = pool.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Received {} results: {} succeeded, {} failed",
        received, snapshot.succeeded, snapshot.failed
    );
    Ok(())
}
