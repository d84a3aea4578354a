//! Infrastructure layer - concrete adapters for the application ports.
//!
//! - Clock abstraction (system time vs mock)
//! - Storage implementations (sharded maps)
//! - Job processors

pub mod clock;
pub mod processor;
pub mod storage;

/// Mock implementations for testing.
///
/// Only available with the `test-helpers` feature or in test builds. Provides
/// a controllable clock and a tracing layer that records events.
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
