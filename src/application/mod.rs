//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain types at runtime:
//! - Rate limiters (single window and per-key)
//! - Window registry (storage of per-key state)
//! - Worker pool (job queue, workers, result stream)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters implement, so it stays independent of clocks, maps and
//! concrete processors.

pub mod limiter;
pub mod metrics;
#[cfg(feature = "async")]
pub mod pool;
pub mod ports;
pub mod registry;
