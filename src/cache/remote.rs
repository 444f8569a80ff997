//! Remote Store Module
//!
//! Contract for the authoritative remote key-value store.
//!
//! The cache composes a client implementing this trait; it never owns
//! the wire protocol, connection management or timeouts. Every method
//! may block for as long as the underlying client allows.

use async_trait::async_trait;
use thiserror::Error;

// == Remote Error ==
/// Failure reported by a remote store client.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The store could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other failure reported by the client
    #[error("Backend failure: {0}")]
    Backend(String),
}

impl RemoteError {
    /// Returns true when the failure means the store is unreachable.
    pub fn is_connection(&self) -> bool {
        matches!(self, RemoteError::Connection(_))
    }
}

// == Remote Store Trait ==
/// Client contract for the remote key-value store.
///
/// Keys and values cross this boundary as raw bytes; the cache owns key
/// derivation and value encoding. The cache absorbs every error
/// returned here and degrades to local-only operation, so
/// implementations should report failures rather than retry internally.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches the bytes stored under `key`, if any.
    async fn get(&self, key: &[u8]) -> std::result::Result<Option<Vec<u8>>, RemoteError>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &[u8], value: Vec<u8>) -> std::result::Result<(), RemoteError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &[u8]) -> std::result::Result<(), RemoteError>;

    /// Returns all keys matching a glob-style `pattern`.
    async fn keys(&self, pattern: &[u8]) -> std::result::Result<Vec<Vec<u8>>, RemoteError>;
}

// == Lookup ==
/// Outcome of a remote read before it is collapsed at the public
/// boundary, where `NotFound` and `Unavailable` both read as a miss.
#[derive(Debug)]
pub(crate) enum Lookup {
    /// The store returned bytes for the key
    Found(Vec<u8>),
    /// The store is reachable but holds no value
    NotFound,
    /// The store could not be reached
    Unavailable,
}
