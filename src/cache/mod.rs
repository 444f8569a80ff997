//! Cache Module
//!
//! Namespaced two-tier caching: a process-local mapping in front of a
//! remote key-value store, with best-effort write-through and automatic
//! fallback to local-only operation when the store is unreachable.

mod codec;
mod entry;
mod key;
mod local;
mod memory;
mod pattern;
mod remote;
mod session;
mod stats;
mod store;


// Re-export public types
pub use codec::{Codec, JsonCodec};
pub use entry::CacheEntry;
pub use key::{KeyDeriver, UserScope};
pub use local::LocalMap;
pub use memory::InMemoryStore;
pub use remote::{RemoteError, RemoteStore};
pub use session::{FixedSession, NoSession, SessionProvider};
pub use stats::CacheStats;
pub use store::{NamespacedCache, WriteOutcome};

// == Public Constants ==
/// Separator between the namespace and the rest of a derived key
pub const NAMESPACE_SEPARATOR: char = '|';

/// Prefix folded into derived keys that carry a user scope
pub const USER_KEY_PREFIX: &str = "user:";

/// Wildcard appended to prefixes for remote key queries
pub const WILDCARD: char = '*';
