//! In-Memory Store Module
//!
//! A process-local implementation of the remote store contract, used by
//! the test suites and for running hosts without real infrastructure.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::cache::remote::{RemoteError, RemoteStore};
use crate::cache::WILDCARD;

// == In-Memory Store ==
/// In-process stand-in for the remote store.
///
/// Holds raw bytes keyed by raw bytes. An offline toggle makes every
/// operation report a connection failure, and a call counter exposes
/// how often the cache actually reached the store, so degradation and
/// isolation behaviour can be asserted in tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Byte storage behind a mutex; critical sections never await
    entries: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    /// While true, every operation fails with a connection error
    offline: AtomicBool,
    /// Total operations attempted against this store
    calls: AtomicU64,
}

impl InMemoryStore {
    // == Constructor ==
    /// Creates a new empty store in the online state.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set Offline ==
    /// Switches the store between reachable and unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    // == Call Count ==
    /// Returns how many operations were attempted, reachable or not.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    // == Length ==
    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store mutex poisoned").len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Insert Raw ==
    /// Seeds raw bytes directly, bypassing the cache and its codec.
    pub fn insert_raw(&self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.into(), value.into());
    }

    // == Raw ==
    /// Reads raw bytes directly, bypassing the cache and its codec.
    pub fn raw(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    /// Records one attempted operation and reports reachability.
    fn check_online(&self) -> std::result::Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Connection("store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    /// Matches a key against the trailing-wildcard pattern form the
    /// cache issues; any other pattern is compared literally.
    fn matches(pattern: &[u8], key: &[u8]) -> bool {
        match pattern.split_last() {
            Some((last, prefix)) if *last == WILDCARD as u8 => key.starts_with(prefix),
            _ => key == pattern,
        }
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn get(&self, key: &[u8]) -> std::result::Result<Option<Vec<u8>>, RemoteError> {
        self.check_online()?;
        Ok(self
            .entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &[u8], value: Vec<u8>) -> std::result::Result<(), RemoteError> {
        self.check_online()?;
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_vec(), value);
        Ok(())
    }

    async fn delete(&self, key: &[u8]) -> std::result::Result<(), RemoteError> {
        self.check_online()?;
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        Ok(())
    }

    async fn keys(&self, pattern: &[u8]) -> std::result::Result<Vec<Vec<u8>>, RemoteError> {
        self.check_online()?;
        Ok(self
            .entries
            .lock()
            .expect("store mutex poisoned")
            .keys()
            .filter(|key| Self::matches(pattern, key))
            .cloned()
            .collect())
    }
}
