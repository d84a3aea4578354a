//! Resource keys for per-key rate limiting.
//!
//! A key identifies one independently limited resource: a user, an endpoint,
//! a tenant. Keys are hashed once on entry so the limiter's map stores a plain
//! `u64` instead of owned strings.

use ahash::AHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Hashed identity of a rate-limited resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LimitKey(u64);

impl LimitKey {
    /// Compute a key from a resource name.
    pub fn new(name: &str) -> Self {
        let mut hasher = AHasher::default();
        name.hash(&mut hasher);
        LimitKey(hasher.finish())
    }

    /// Compute a key from a scope and a resource name, e.g. `("user", "alice")`.
    ///
    /// The scope is hashed separately, so `("ab", "c")` and `("a", "bc")` differ.
    pub fn scoped(scope: &str, name: &str) -> Self {
        let mut hasher = AHasher::default();
        scope.hash(&mut hasher);
        name.hash(&mut hasher);
        LimitKey(hasher.finish())
    }

    /// Get the raw hash value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<&str> for LimitKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for LimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
