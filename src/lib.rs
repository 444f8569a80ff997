//! Tiered Cache - a namespaced two-tier key-value cache
//!
//! Fronts a remote key-value store with a process-local mapping. Every
//! key is prefixed with a process-wide namespace (and optionally a user
//! scope), writes go through to the remote store best effort, and when
//! the store is unreachable every operation degrades to local-only
//! behaviour instead of failing.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    CacheEntry, CacheStats, Codec, FixedSession, InMemoryStore, JsonCodec, KeyDeriver,
    NamespacedCache, NoSession, RemoteError, RemoteStore, SessionProvider, UserScope,
    WriteOutcome,
};
pub use config::{Config, InstallMode};
pub use error::{CacheError, Result};
