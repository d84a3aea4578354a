//! Domain layer - pure types and rules with no runtime dependencies.
//!
//! This layer contains the core concepts of the crate:
//! - Jobs and job results for the worker pool
//! - Admission policies for rate limiting
//! - Resource keys for per-key limiting
//! - Expense accounts
//! - The error classification shared by every module
//!
//! All types in this layer are synchronous and easily testable.

pub mod job;
pub mod key;
pub mod kind;
pub mod ledger;
pub mod policy;
