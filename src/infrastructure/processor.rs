//! Ready-made job processors.

use crate::application::ports::JobProcessor;
use crate::domain::job::{Job, JobError};

/// Processor that upper-cases the payload. Empty payloads fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseProcessor;

impl JobProcessor for UppercaseProcessor {
    fn process(&self, job: &Job) -> Result<String, JobError> {
        if job.payload().is_empty() {
            return Err(JobError::failed("empty payload"));
        }
        Ok(job.payload().to_uppercase())
    }
}
