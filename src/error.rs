//! Error types for the tiered cache
//!
//! Provides unified error handling using thiserror.
//!
//! Remote-store unavailability is deliberately not represented here: it
//! is absorbed at every call site and downgrades the operation to
//! local-only behaviour instead of surfacing to callers.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Value could not be encoded for, or decoded from, the remote tier
    #[error("Codec failure: {0}")]
    Codec(String),

    /// No session user could be resolved for a user-scoped key
    #[error("Session unavailable: {0}")]
    Session(String),

    /// Namespace contains the reserved separator character
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
