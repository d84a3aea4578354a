//! Jobs and their results.
//!
//! A [`Job`] is an immutable unit of work. Processing it yields exactly one
//! [`JobResult`], whose outcome is either the derived payload or a [`JobError`].

use std::fmt;

/// Opaque job identifier chosen by the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl JobId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        JobId(id)
    }

    /// Get the raw identifier.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        JobId(id)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// A unit of work submitted to the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobId,
    payload: String,
}

impl Job {
    /// Create a job.
    pub fn new(id: u64, payload: impl Into<String>) -> Self {
        Self {
            id: JobId(id),
            payload: payload.into(),
        }
    }

    /// The job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// The job payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Failure while processing a job.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    /// The processor reported a failure
    #[error("job failed: {0}")]
    Failed(String),
    /// The processor panicked; the worker recovered and kept running
    #[error("job processor panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Build a `Failed` error from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        JobError::Failed(message.into())
    }
}

/// Output produced from processing one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    /// Identifier of the job this result belongs to
    pub job_id: JobId,
    /// Index of the worker that processed the job
    pub worker: usize,
    /// Derived payload, or the reason processing failed
    pub outcome: Result<String, JobError>,
}

impl JobResult {
    /// Check whether processing succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The derived payload, if processing succeeded.
    pub fn output(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_accessors() {
        let job = Job::new(7, "resize image");
        assert_eq!(job.id(), JobId::new(7));
        assert_eq!(job.payload(), "resize image");
        assert_eq!(job.id().to_string(), "job-7");
    }

    #[test]
    fn test_result_output() {
        let ok = JobResult {
            job_id: JobId::new(1),
            worker: 0,
            outcome: Ok("DONE".to_string()),
        };
        assert!(ok.is_ok());
        assert_eq!(ok.output(), Some("DONE"));

        let failed = JobResult {
            job_id: JobId::new(2),
            worker: 1,
            outcome: Err(JobError::failed("disk full")),
        };
        assert!(!failed.is_ok());
        assert_eq!(failed.output(), None);
        assert_eq!(
            failed.outcome.unwrap_err().to_string(),
            "job failed: disk full"
        );
    }
}
