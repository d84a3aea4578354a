//! Error classification shared across the crate.
//!
//! Every error type exposes a `kind()` so callers can branch on the broad
//! category without matching each variant.

use std::fmt;

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A lookup missed (unknown account, unknown category)
    NotFound,
    /// The caller passed a value outside the accepted domain
    InvalidInput,
    /// A quota, balance or queue has no room left
    ResourceExhausted,
    /// The component was already shut down; signals a programming error
    Closed,
    /// The caller gave up waiting
    Cancelled,
    /// A component failed internally (e.g. a worker task died)
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::ResourceExhausted => "resource exhausted",
            ErrorKind::Closed => "closed",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}
