//! Cache Store Module
//!
//! The tier coordinator: orchestrates reads, writes and deletes across
//! the process-local mapping and the remote store, degrading to
//! local-only operation whenever the remote store is unreachable or
//! installation mode is active.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::codec::{Codec, JsonCodec};
use crate::cache::key::{KeyDeriver, UserScope};
use crate::cache::local::LocalMap;
use crate::cache::remote::{Lookup, RemoteError, RemoteStore};
use crate::cache::session::SessionProvider;
use crate::cache::{CacheEntry, CacheStats};
use crate::config::{Config, InstallMode};
use crate::error::Result;

// == Write Outcome ==
/// How far a write reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Both tiers hold the value
    Full,
    /// Only the local mapping holds the value; the remote write was
    /// skipped or failed
    LocalOnly,
}

// == Namespaced Cache ==
/// Two-tier cache fronting a remote key-value store.
///
/// Every operation derives a namespaced key, keeps the local mapping
/// authoritative within the process, and treats the remote store as a
/// best-effort write-through target. Remote connection failures are
/// absorbed at every call site; only codec and session-resolution
/// failures reach the caller.
///
/// # Locking
/// The local mapping and its counters live behind a single
/// `tokio::sync::RwLock`. The whole miss path (remote fetch, generator
/// run, population) executes under the write guard, which serializes
/// misses per instance and guarantees a generator runs at most once per
/// key within a process.
pub struct NamespacedCache {
    /// Derives fully-qualified keys
    pub(crate) keys: KeyDeriver,
    /// Client for the authoritative remote store
    pub(crate) remote: Arc<dyn RemoteStore>,
    /// Value encoding for the remote tier
    pub(crate) codec: Arc<dyn Codec>,
    /// Host-owned flag that forces local-only operation
    pub(crate) install_mode: InstallMode,
    /// Process-local tier
    pub(crate) local: RwLock<LocalMap>,
}

impl NamespacedCache {
    // == Constructors ==
    /// Creates a cache with the default JSON codec.
    ///
    /// # Arguments
    /// * `namespace` - Namespace prefixed onto every derived key
    /// * `remote` - Client for the remote store
    /// * `session` - Resolver for `UserScope::Current`
    /// * `install_mode` - Host-owned local-only flag
    ///
    /// # Errors
    /// `CacheError::InvalidNamespace` if the namespace contains the
    /// separator character.
    pub fn new(
        namespace: impl Into<String>,
        remote: Arc<dyn RemoteStore>,
        session: Arc<dyn SessionProvider>,
        install_mode: InstallMode,
    ) -> Result<Self> {
        Self::with_codec(namespace, remote, Arc::new(JsonCodec), session, install_mode)
    }

    /// Creates a cache with a custom codec.
    pub fn with_codec(
        namespace: impl Into<String>,
        remote: Arc<dyn RemoteStore>,
        codec: Arc<dyn Codec>,
        session: Arc<dyn SessionProvider>,
        install_mode: InstallMode,
    ) -> Result<Self> {
        Ok(Self {
            keys: KeyDeriver::new(namespace, session)?,
            remote,
            codec,
            install_mode,
            local: RwLock::new(LocalMap::new()),
        })
    }

    /// Creates a cache from configuration with the default JSON codec.
    pub fn from_config(
        config: &Config,
        remote: Arc<dyn RemoteStore>,
        session: Arc<dyn SessionProvider>,
        install_mode: InstallMode,
    ) -> Result<Self> {
        Self::new(config.namespace.clone(), remote, session, install_mode)
    }

    // == Namespace ==
    /// Returns the namespace this cache derives keys under.
    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    // == Set ==
    /// Stores a value under a logical key.
    ///
    /// The local mapping is updated first and unconditionally, so the
    /// value is immediately visible to reads in this process whatever
    /// happens on the remote side. The remote write is skipped in
    /// installation mode and survives connection failures; both cases
    /// report `WriteOutcome::LocalOnly`.
    ///
    /// # Arguments
    /// * `key` - The logical cache key
    /// * `value` - The value to store
    /// * `scope` - Optional user scope isolating the key per user
    ///
    /// # Errors
    /// `CacheError::Session` when scope resolution fails, or
    /// `CacheError::Codec` when the value cannot be encoded (the local
    /// write has already taken effect in that case).
    pub async fn set_value(
        &self,
        key: &str,
        value: Value,
        scope: Option<&UserScope>,
    ) -> Result<WriteOutcome> {
        let full_key = self.keys.make_key(key, scope)?;
        self.set_derived(&full_key, value).await
    }

    /// Stores a value under an already fully-qualified key.
    pub(crate) async fn set_derived(&self, full_key: &str, value: Value) -> Result<WriteOutcome> {
        {
            let mut local = self.local.write().await;
            local.insert(full_key.to_string(), CacheEntry::Present(value.clone()));
        }
        self.write_through(full_key, &value).await
    }

    // == Get ==
    /// Returns the value under a logical key, if any.
    ///
    /// The local mapping is authoritative once populated: a present
    /// entry (negative markers included) is returned without a remote
    /// round-trip. On a local miss the remote store is consulted unless
    /// installation mode is active; a connection failure reads as "not
    /// found". A miss in both tiers stores a negative marker so the
    /// remote store is not asked again for this key within the process.
    ///
    /// # Errors
    /// `CacheError::Session` when scope resolution fails, or
    /// `CacheError::Codec` when remote bytes fail to decode.
    pub async fn get_value(&self, key: &str, scope: Option<&UserScope>) -> Result<Option<Value>> {
        let full_key = self.keys.make_key(key, scope)?;
        self.get_derived(&full_key, None::<fn() -> Value>).await
    }

    /// Returns the value under a logical key, generating it on a miss.
    ///
    /// On a miss in both tiers the generator runs exactly once, its
    /// value is stored locally and written through to the remote store
    /// (best effort), and the generated value is returned directly.
    ///
    /// Returns `None` only when the key already carries a local
    /// negative marker from an earlier generator-less read; the
    /// generator is not invoked in that case.
    ///
    /// # Arguments
    /// * `key` - The logical cache key
    /// * `scope` - Optional user scope isolating the key per user
    /// * `generator` - Produces the value when both tiers miss
    pub async fn get_or_generate<F>(
        &self,
        key: &str,
        scope: Option<&UserScope>,
        generator: F,
    ) -> Result<Option<Value>>
    where
        F: FnOnce() -> Value + Send,
    {
        let full_key = self.keys.make_key(key, scope)?;
        self.get_derived(&full_key, Some(generator)).await
    }

    /// Read path over an already fully-qualified key.
    pub(crate) async fn get_derived<F>(
        &self,
        full_key: &str,
        generator: Option<F>,
    ) -> Result<Option<Value>>
    where
        F: FnOnce() -> Value + Send,
    {
        let mut local = self.local.write().await;

        if let Some(entry) = local.get(full_key) {
            let value = entry.value().cloned();
            local.stats_mut().record_local_hit();
            return Ok(value);
        }

        let lookup = if self.install_mode.is_active() {
            debug!("Install mode active, skipping remote get for '{}'", full_key);
            Lookup::NotFound
        } else {
            self.lookup_remote(full_key).await
        };

        if matches!(lookup, Lookup::Unavailable) {
            local.stats_mut().record_degraded();
        }

        if let Lookup::Found(bytes) = lookup {
            let value = self.codec.decode(&bytes)?;
            local.stats_mut().record_remote_hit();
            local.insert(full_key.to_string(), CacheEntry::Present(value.clone()));
            return Ok(Some(value));
        }

        match generator {
            Some(generate) => {
                let value = generate();
                local.stats_mut().record_generated();
                local.insert(full_key.to_string(), CacheEntry::Present(value.clone()));
                drop(local);
                self.write_through(full_key, &value).await?;
                Ok(Some(value))
            }
            None => {
                local.stats_mut().record_miss();
                local.insert(full_key.to_string(), CacheEntry::Absent);
                Ok(None)
            }
        }
    }

    // == Get All ==
    /// Returns every value whose key starts with `prefix`.
    ///
    /// Keys are matched through the pattern resolver and each value is
    /// fetched through the normal read path, so results populate the
    /// local mapping like any other read. The result maps each matched
    /// fully-qualified key to its value; keys holding a negative marker
    /// are omitted.
    ///
    /// # Errors
    /// `CacheError::Codec` when any matched value fails to decode.
    pub async fn get_all(&self, prefix: &str) -> Result<HashMap<String, Value>> {
        let mut values = HashMap::new();
        for full_key in self.resolve_keys(prefix).await {
            if let Some(value) = self.get_derived(&full_key, None::<fn() -> Value>).await? {
                values.insert(full_key, value);
            }
        }
        Ok(values)
    }

    // == Delete ==
    /// Deletes one or more logical keys, best effort.
    ///
    /// Per key: the remote delete is attempted (skipped in installation
    /// mode, connection failures swallowed), then the local entry is
    /// removed. Remote unavailability never surfaces as an error.
    ///
    /// # Arguments
    /// * `keys` - Logical keys to delete
    /// * `scope` - Optional user scope the keys were stored under
    ///
    /// # Errors
    /// Only `CacheError::Session`, when scope resolution fails.
    pub async fn delete_value<I, S>(&self, keys: I, scope: Option<&UserScope>) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            let full_key = self.keys.make_key(key.as_ref(), scope)?;
            self.delete_derived(&full_key).await;
        }
        Ok(())
    }

    /// Deletes an already fully-qualified key from both tiers.
    pub(crate) async fn delete_derived(&self, full_key: &str) {
        let mut failed = false;
        if !self.install_mode.is_active() {
            if let Err(err) = self.remote.delete(full_key.as_bytes()).await {
                Self::log_remote_failure("delete", full_key, &err);
                failed = true;
            }
        }

        let mut local = self.local.write().await;
        if failed {
            local.stats_mut().record_degraded();
        }
        local.remove(full_key);
    }

    // == Delete Keys ==
    /// Deletes every key starting with `prefix`, best effort.
    ///
    /// The pattern resolver already returns fully-qualified keys, so no
    /// re-derivation happens here. Resolution and deletion failures are
    /// swallowed.
    pub async fn delete_keys(&self, prefix: &str) {
        for full_key in self.resolve_keys(prefix).await {
            self.delete_derived(&full_key).await;
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.local.read().await.stats()
    }

    // == Length ==
    /// Returns the number of entries in the local mapping.
    pub async fn len(&self) -> usize {
        self.local.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the local mapping holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.local.read().await.is_empty()
    }

    // == Internals ==
    /// Remote read collapsed into the three outcomes the read path
    /// distinguishes.
    async fn lookup_remote(&self, full_key: &str) -> Lookup {
        match self.remote.get(full_key.as_bytes()).await {
            Ok(Some(bytes)) => Lookup::Found(bytes),
            Ok(None) => Lookup::NotFound,
            Err(err) => {
                Self::log_remote_failure("get", full_key, &err);
                Lookup::Unavailable
            }
        }
    }

    /// Best-effort remote write shared by set and the generator path.
    ///
    /// Encode failures propagate; remote failures and installation mode
    /// downgrade the outcome instead.
    async fn write_through(&self, full_key: &str, value: &Value) -> Result<WriteOutcome> {
        if self.install_mode.is_active() {
            debug!("Install mode active, skipping remote set for '{}'", full_key);
            self.local.write().await.stats_mut().record_degraded();
            return Ok(WriteOutcome::LocalOnly);
        }

        let encoded = self.codec.encode(value)?;
        match self.remote.set(full_key.as_bytes(), encoded).await {
            Ok(()) => Ok(WriteOutcome::Full),
            Err(err) => {
                Self::log_remote_failure("set", full_key, &err);
                self.local.write().await.stats_mut().record_degraded();
                Ok(WriteOutcome::LocalOnly)
            }
        }
    }

    /// Logs a swallowed remote failure, connection errors quietly.
    pub(crate) fn log_remote_failure(op: &str, full_key: &str, err: &RemoteError) {
        if err.is_connection() {
            debug!(
                "Remote {} unreachable for '{}': {} (continuing locally)",
                op, full_key, err
            );
        } else {
            warn!(
                "Remote {} failed for '{}': {} (continuing locally)",
                op, full_key, err
            );
        }
    }
}
