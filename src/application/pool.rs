//! Bounded async worker pool.
//!
//! A fixed set of tokio tasks share one bounded job queue. Each worker takes a
//! job, runs the [`JobProcessor`] on it and publishes exactly one
//! [`JobResult`]. Closing the pool drops the queue sender; workers drain what
//! is left, exit, and the result stream ends once the last worker is gone.
//!
//! ```text
//!  submit ──► [ bounded job queue ] ──► worker 0 ─┐
//!                                   ├─► worker 1 ─┼─► [ result queue ] ──► ResultStream
//!                                   └─► worker N ─┘
//! ```

use crate::application::metrics::PoolMetrics;
use crate::application::ports::JobProcessor;
use crate::domain::job::{Job, JobError, JobResult};
use crate::domain::kind::ErrorKind;
use crate::infrastructure::processor::UppercaseProcessor;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Error returned by pool operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool no longer accepts jobs
    #[error("worker pool is closed")]
    Closed,
    /// The cancellation token fired before the job was queued
    #[error("submission of {} was cancelled", .0.id())]
    Cancelled(Job),
    /// The queue had no free slot
    #[error("job queue is full, {} was not queued", .0.id())]
    QueueFull(Job),
    /// The result stream was already handed out
    #[error("result stream was already taken")]
    ResultsTaken,
    /// Some worker tasks ended abnormally while closing
    #[error("{count} worker task(s) terminated abnormally")]
    WorkerPanicked {
        /// Number of workers that did not exit cleanly
        count: usize,
    },
}

impl PoolError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PoolError::Closed => ErrorKind::Closed,
            PoolError::Cancelled(_) => ErrorKind::Cancelled,
            PoolError::QueueFull(_) => ErrorKind::ResourceExhausted,
            PoolError::ResultsTaken => ErrorKind::InvalidInput,
            PoolError::WorkerPanicked { .. } => ErrorKind::Internal,
        }
    }

    /// Recover the job carried by a rejected submission.
    pub fn into_job(self) -> Option<Job> {
        match self {
            PoolError::Cancelled(job) | PoolError::QueueFull(job) => Some(job),
            _ => None,
        }
    }
}

/// Error returned when building a pool fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A pool needs at least one worker
    #[error("worker count must be greater than 0")]
    ZeroWorkers,
    /// The job queue needs at least one slot
    #[error("queue capacity must be greater than 0")]
    ZeroQueueCapacity,
    /// Workers are tokio tasks and need a runtime to be spawned on
    #[error("worker pool must be built inside a tokio runtime")]
    NoRuntime,
}

impl BuildError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorkerPoolConfig {
    /// Number of worker tasks
    pub workers: usize,
    /// Jobs that can wait in the queue before `submit` applies backpressure
    pub queue_capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
        }
    }
}

impl WorkerPoolConfig {
    /// Create a config with `workers` tasks and the default queue capacity.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    /// Set the queue capacity.
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Check the sizing is usable.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.workers == 0 {
            return Err(BuildError::ZeroWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(BuildError::ZeroQueueCapacity);
        }
        Ok(())
    }
}

/// Builder for constructing a [`WorkerPool`].
pub struct WorkerPoolBuilder {
    config: WorkerPoolConfig,
    processor: Option<Arc<dyn JobProcessor>>,
}

impl WorkerPoolBuilder {
    /// Set the number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the queue capacity.
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.config.queue_capacity = queue_capacity;
        self
    }

    /// Replace the whole sizing config.
    pub fn with_config(mut self, config: WorkerPoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the processor run on every job.
    pub fn with_processor(mut self, processor: impl JobProcessor) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    /// Validate the configuration and spawn the workers.
    ///
    /// # Errors
    /// Returns a `BuildError` for zero sizes or when called outside a tokio runtime.
    pub fn build(self) -> Result<WorkerPool, BuildError> {
        self.config.validate()?;
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(BuildError::NoRuntime);
        }

        let processor = self
            .processor
            .unwrap_or_else(|| Arc::new(UppercaseProcessor));
        Ok(WorkerPool::spawn(self.config, processor))
    }
}

/// Finite stream of job results.
///
/// Yields results in completion order and ends once the pool is closed and
/// every worker has exited. It can only be obtained once per pool.
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::UnboundedReceiver<JobResult>,
}

impl ResultStream {
    /// Wait for the next result. `None` means the pool is closed and drained.
    pub async fn next(&mut self) -> Option<JobResult> {
        self.rx.recv().await
    }

    /// Take a result if one is ready, without waiting.
    pub fn try_next(&mut self) -> Option<JobResult> {
        self.rx.try_recv().ok()
    }

    /// Wait for every remaining result.
    pub async fn collect(mut self) -> Vec<JobResult> {
        let mut results = Vec::new();
        while let Some(result) = self.rx.recv().await {
            results.push(result);
        }
        results
    }
}

// No lock in this module guards state that a panic could leave inconsistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed-size pool of async workers.
///
/// Dropping the pool without calling [`close`](Self::close) also closes the
/// queue; workers finish the queued jobs in the background.
///
/// # Example
/// ```
/// use worker_throttle::{Job, WorkerPool};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = WorkerPool::builder().with_workers(3).build()?;
/// let results = pool.results()?;
///
/// for id in 0..10 {
///     pool.submit(Job::new(id, format!("job {id}"))).await?;
/// }
/// pool.close().await?;
///
/// assert_eq!(results.collect().await.len(), 10);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WorkerPool {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    // Held across the joins so every `close` waits for the same drain.
    workers: tokio::sync::Mutex<Vec<JoinHandle<()>>>,
    abnormal_exits: AtomicUsize,
    results: Mutex<Option<mpsc::UnboundedReceiver<JobResult>>>,
    config: WorkerPoolConfig,
    metrics: PoolMetrics,
}

impl WorkerPool {
    /// Create a builder for configuring the pool.
    ///
    /// Defaults: 4 workers, queue capacity 64, [`UppercaseProcessor`].
    pub fn builder() -> WorkerPoolBuilder {
        WorkerPoolBuilder {
            config: WorkerPoolConfig::default(),
            processor: None,
        }
    }

    /// Create a pool with `workers` tasks running `processor`.
    pub fn new(workers: usize, processor: impl JobProcessor) -> Result<Self, BuildError> {
        Self::builder()
            .with_workers(workers)
            .with_processor(processor)
            .build()
    }

    /// Create a pool from a config and a processor.
    pub fn with_config(
        config: WorkerPoolConfig,
        processor: impl JobProcessor,
    ) -> Result<Self, BuildError> {
        Self::builder()
            .with_config(config)
            .with_processor(processor)
            .build()
    }

    fn spawn(config: WorkerPoolConfig, processor: Arc<dyn JobProcessor>) -> Self {
        let (job_tx, job_rx) = mpsc::channel(config.queue_capacity);
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let job_rx = Arc::new(tokio::sync::Mutex::new(job_rx));
        let metrics = PoolMetrics::new();

        let workers = (0..config.workers)
            .map(|index| {
                let worker = Worker {
                    index,
                    jobs: Arc::clone(&job_rx),
                    results: result_tx.clone(),
                    processor: Arc::clone(&processor),
                    metrics: metrics.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        tracing::debug!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "worker pool started"
        );

        Self {
            sender: Mutex::new(Some(job_tx)),
            workers: tokio::sync::Mutex::new(workers),
            abnormal_exits: AtomicUsize::new(0),
            results: Mutex::new(Some(result_rx)),
            config,
            metrics,
        }
    }

    fn sender(&self) -> Result<mpsc::Sender<Job>, PoolError> {
        lock(&self.sender).clone().ok_or_else(|| {
            tracing::debug!("submission rejected, pool is closed");
            PoolError::Closed
        })
    }

    fn accepted(&self, job: &Job) {
        self.metrics.record_submitted();
        tracing::trace!(job = %job.id(), "job queued");
    }

    /// Queue a job, waiting while the queue is full.
    ///
    /// # Errors
    /// `PoolError::Closed` if [`close`](Self::close) was already called.
    pub async fn submit(&self, job: Job) -> Result<(), PoolError> {
        let sender = self.sender()?;
        let permit = sender.reserve().await.map_err(|_| PoolError::Closed)?;
        self.accepted(&job);
        permit.send(job);
        Ok(())
    }

    /// Queue a job, giving up if `cancel` fires while waiting for a free slot.
    ///
    /// # Errors
    /// `PoolError::Cancelled` carries the job back to the caller;
    /// `PoolError::Closed` if the pool was closed.
    pub async fn submit_with_cancel(
        &self,
        job: Job,
        cancel: &CancellationToken,
    ) -> Result<(), PoolError> {
        let sender = self.sender()?;
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(job = %job.id(), "submission cancelled");
                return Err(PoolError::Cancelled(job));
            }
            permit = sender.reserve() => permit.map_err(|_| PoolError::Closed)?,
        };
        self.accepted(&job);
        permit.send(job);
        Ok(())
    }

    /// Queue a job only if a slot is free right now.
    ///
    /// # Errors
    /// `PoolError::QueueFull` carries the job back when the queue is full.
    pub fn try_submit(&self, job: Job) -> Result<(), PoolError> {
        let sender = self.sender()?;
        let outcome = match sender.try_reserve() {
            Ok(permit) => {
                self.accepted(&job);
                permit.send(job);
                Ok(())
            }
            Err(TrySendError::Full(())) => Err(PoolError::QueueFull(job)),
            Err(TrySendError::Closed(())) => Err(PoolError::Closed),
        };
        outcome
    }

    /// Take the result stream. Only the first call succeeds.
    ///
    /// # Errors
    /// `PoolError::ResultsTaken` on every later call.
    pub fn results(&self) -> Result<ResultStream, PoolError> {
        lock(&self.results)
            .take()
            .map(|rx| ResultStream { rx })
            .ok_or(PoolError::ResultsTaken)
    }

    /// Stop accepting jobs and wait until every queued job is processed.
    ///
    /// When this returns, all workers have exited and the result stream ends
    /// after the last result. Concurrent or repeated calls all wait for the
    /// same drain and report the same outcome. If a `close` future is dropped
    /// midway, the next call resumes waiting on the remaining workers.
    ///
    /// # Errors
    /// `PoolError::WorkerPanicked` if any worker task ended abnormally; all
    /// workers are still awaited first.
    pub async fn close(&self) -> Result<(), PoolError> {
        let was_open = lock(&self.sender).take().is_some();
        if was_open {
            tracing::info!(workers = self.config.workers, "closing worker pool");
        }

        let mut workers = self.workers.lock().await;
        let joining = !workers.is_empty();

        // A handle is only removed once it has completed, so a cancelled
        // call leaves the rest for the next one.
        while let Some(handle) = workers.last_mut() {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "worker task terminated abnormally");
                self.abnormal_exits.fetch_add(1, Ordering::Relaxed);
            }
            workers.pop();
        }
        drop(workers);

        let abnormal = self.abnormal_exits.load(Ordering::Relaxed);
        if abnormal > 0 {
            return Err(PoolError::WorkerPanicked { count: abnormal });
        }

        if joining {
            let snapshot = self.metrics.snapshot();
            tracing::info!(
                succeeded = snapshot.succeeded,
                failed = snapshot.failed,
                "worker pool drained"
            );
        }
        Ok(())
    }

    /// Check whether the pool stopped accepting jobs.
    pub fn is_closed(&self) -> bool {
        lock(&self.sender).is_none()
    }

    /// Number of worker tasks.
    pub fn worker_count(&self) -> usize {
        self.config.workers
    }

    /// Queue capacity.
    pub fn queue_capacity(&self) -> usize {
        self.config.queue_capacity
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

struct Worker {
    index: usize,
    jobs: Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>,
    results: mpsc::UnboundedSender<JobResult>,
    processor: Arc<dyn JobProcessor>,
    metrics: PoolMetrics,
}

impl Worker {
    async fn run(self) {
        tracing::debug!(worker = self.index, "worker started");

        loop {
            // Only the receive is under the lock; processing runs unlocked.
            let next = self.jobs.lock().await.recv().await;
            let Some(job) = next else {
                break;
            };

            let result = self.process(job).await;
            if self.results.send(result).is_err() {
                tracing::trace!(worker = self.index, "result stream dropped, discarding result");
            }
        }

        tracing::debug!(worker = self.index, "worker exiting");
    }

    async fn process(&self, job: Job) -> JobResult {
        let job_id = job.id();
        let processor = Arc::clone(&self.processor);

        // Processors are synchronous; keep them off the async worker threads.
        let outcome = tokio::task::spawn_blocking(move || {
            panic::catch_unwind(AssertUnwindSafe(|| processor.process(&job)))
                .unwrap_or_else(|payload| Err(JobError::Panicked(panic_message(payload.as_ref()))))
        })
        .await
        .unwrap_or_else(|err| Err(JobError::Panicked(err.to_string())));

        match &outcome {
            Ok(_) => self.metrics.record_succeeded(),
            Err(err) => {
                self.metrics.record_failed();
                tracing::warn!(worker = self.index, job = %job_id, error = %err, "job failed");
            }
        }

        JobResult {
            job_id,
            worker: self.index,
            outcome,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::Duration;

    #[tokio::test]
    async fn test_three_workers_ten_jobs() {
        let pool = WorkerPool::builder().with_workers(3).build().unwrap();
        let results = pool.results().unwrap();

        for id in 0..10 {
            pool.submit(Job::new(id, format!("job {id}"))).await.unwrap();
        }
        pool.close().await.unwrap();

        let results = results.collect().await;
        assert_eq!(results.len(), 10);

        let ids: BTreeSet<u64> = results.iter().map(|r| r.job_id.as_u64()).collect();
        assert_eq!(ids, (0..10).collect());
        assert!(results.iter().all(|r| r.worker < 3));
        assert!(results
            .iter()
            .all(|r| r.output() == Some(format!("JOB {}", r.job_id.as_u64()).as_str())));
    }

    #[tokio::test]
    async fn test_submit_after_close_fails() {
        let pool = WorkerPool::builder().with_workers(1).build().unwrap();
        pool.close().await.unwrap();

        assert!(pool.is_closed());
        let err = pool.submit(Job::new(1, "late")).await.unwrap_err();
        assert_eq!(err, PoolError::Closed);
        assert_eq!(err.kind(), ErrorKind::Closed);

        // Closing twice is harmless.
        pool.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_results_taken_once() {
        let pool = WorkerPool::builder().with_workers(1).build().unwrap();
        let _stream = pool.results().unwrap();
        assert_eq!(pool.results().unwrap_err(), PoolError::ResultsTaken);
        pool.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_and_panics_become_results() {
        let pool = WorkerPool::new(2, |job: &Job| match job.payload() {
            "fail" => Err(JobError::failed("refused")),
            "panic" => panic!("processor exploded"),
            other => Ok(other.len().to_string()),
        })
        .unwrap();
        let results = pool.results().unwrap();

        for (id, payload) in ["ok", "fail", "panic", "fine"].into_iter().enumerate() {
            pool.submit(Job::new(id as u64, payload)).await.unwrap();
        }
        pool.close().await.unwrap();

        let mut results = results.collect().await;
        results.sort_by_key(|r| r.job_id);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].output(), Some("2"));
        assert_eq!(results[1].outcome, Err(JobError::failed("refused")));
        assert_eq!(
            results[2].outcome,
            Err(JobError::Panicked("processor exploded".to_string()))
        );
        assert_eq!(results[3].output(), Some("4"));

        let snapshot = pool.metrics().snapshot();
        assert_eq!(snapshot.submitted, 4);
        assert_eq!(snapshot.succeeded, 2);
        assert_eq!(snapshot.failed, 2);
        assert_eq!(snapshot.pending(), 0);
    }

    #[tokio::test]
    async fn test_try_submit_reports_full_queue() {
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);
        let pool = WorkerPool::builder()
            .with_workers(1)
            .with_queue_capacity(1)
            .with_processor(move |job: &Job| -> Result<String, JobError> {
                // Block the only worker until the test releases it.
                let _ = lock(&release_rx).recv_timeout(Duration::from_secs(5));
                Ok(job.payload().to_string())
            })
            .build()
            .unwrap();

        // The worker runs on another thread only in a multi-thread runtime, so
        // fill the queue before yielding: one slot, then full.
        pool.try_submit(Job::new(0, "a")).unwrap();
        let err = pool.try_submit(Job::new(1, "b")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(err.into_job(), Some(Job::new(1, "b")));

        release_tx.send(()).unwrap();
        pool.close().await.unwrap();
        assert_eq!(pool.metrics().submitted(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_submission_returns_job() {
        let pool = WorkerPool::builder()
            .with_workers(1)
            .with_queue_capacity(1)
            .build()
            .unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let err = pool
            .submit_with_cancel(Job::new(9, "payload"), &token)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.into_job().map(|job| job.id().as_u64()), Some(9));

        let live = CancellationToken::new();
        pool.submit_with_cancel(Job::new(10, "payload"), &live)
            .await
            .unwrap();
        pool.close().await.unwrap();
        assert_eq!(pool.metrics().snapshot().completed(), 1);
    }

    #[tokio::test]
    async fn test_logs_failures_and_close() {
        use crate::infrastructure::mocks::MockCaptureLayer;
        use tracing_subscriber::layer::SubscriberExt;

        let layer = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let pool = WorkerPool::new(1, |_: &Job| -> Result<String, JobError> {
            Err(JobError::failed("nope"))
        })
        .unwrap();
        pool.submit(Job::new(7, "x")).await.unwrap();
        pool.close().await.unwrap();

        let failures = layer.with_message("job failed");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].level, tracing::Level::WARN);
        assert_eq!(failures[0].fields.get("job").map(String::as_str), Some("job-7"));
        assert_eq!(layer.with_message("worker pool drained").len(), 1);

        assert!(pool.submit(Job::new(8, "late")).await.is_err());
        assert_eq!(layer.with_message("submission rejected, pool is closed").len(), 1);
    }

    fn slow_pool(delay: Duration) -> WorkerPool {
        WorkerPool::new(1, move |job: &Job| -> Result<String, JobError> {
            std::thread::sleep(delay);
            Ok(job.payload().to_string())
        })
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_close_waits_for_drain() {
        let pool = Arc::new(slow_pool(Duration::from_millis(30)));
        for id in 0..5 {
            pool.submit(Job::new(id, "slow")).await.unwrap();
        }

        let first = tokio::spawn({
            let pool = Arc::clone(&pool);
            async move { pool.close().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        pool.close().await.unwrap();
        assert_eq!(pool.metrics().snapshot().pending(), 0);
        assert_eq!(pool.metrics().snapshot().completed(), 5);
        first.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_close_resumes_after_timeout() {
        let pool = slow_pool(Duration::from_millis(30));
        for id in 0..5 {
            pool.submit(Job::new(id, "slow")).await.unwrap();
        }

        let timed_out = tokio::time::timeout(Duration::from_millis(10), pool.close()).await;
        assert!(timed_out.is_err());
        assert!(pool.is_closed());

        pool.close().await.unwrap();
        assert_eq!(pool.metrics().snapshot().pending(), 0);
        assert_eq!(pool.results().unwrap().collect().await.len(), 5);
    }

    #[tokio::test]
    async fn test_try_submit_accepts_when_slot_free() {
        let pool = WorkerPool::builder().with_workers(1).build().unwrap();
        pool.try_submit(Job::new(3, "quick")).unwrap();
        pool.close().await.unwrap();

        let results = pool.results().unwrap().collect().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].output(), Some("QUICK"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_processor_does_not_stall_runtime() {
        // As many blocking workers as runtime threads.
        let pool = WorkerPool::new(2, |job: &Job| -> Result<String, JobError> {
            std::thread::sleep(Duration::from_millis(200));
            Ok(job.payload().to_string())
        })
        .unwrap();
        pool.submit(Job::new(1, "blocking")).await.unwrap();
        pool.submit(Job::new(2, "blocking")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let ticks = tokio::spawn(async {
            let mut ticks = 0;
            for _ in 0..5 {
                tokio::time::sleep(Duration::from_millis(5)).await;
                ticks += 1;
            }
            ticks
        });
        let other = tokio::spawn(async { 1 + 1 });
        assert_eq!(other.await.unwrap(), 2);
        assert_eq!(
            tokio::time::timeout(Duration::from_millis(150), ticks)
                .await
                .unwrap()
                .unwrap(),
            5
        );

        pool.close().await.unwrap();
    }

    #[test]
    fn test_build_validation() {
        assert_eq!(
            WorkerPool::builder().with_workers(0).build().unwrap_err(),
            BuildError::ZeroWorkers
        );
        assert_eq!(
            WorkerPool::builder()
                .with_queue_capacity(0)
                .build()
                .unwrap_err(),
            BuildError::ZeroQueueCapacity
        );
        // No runtime in a plain #[test].
        assert_eq!(
            WorkerPool::builder().build().unwrap_err(),
            BuildError::NoRuntime
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = WorkerPoolConfig::new(8).with_queue_capacity(16);
        assert_eq!(config.workers, 8);
        assert_eq!(config.queue_capacity, 16);
        assert!(config.validate().is_ok());
        assert_eq!(WorkerPoolConfig::default().workers, 4);
    }
}
