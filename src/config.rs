//! Configuration Module
//!
//! Handles cache configuration from environment variables and the
//! process-wide installation-mode flag.

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace prefixed onto every derived key.
    ///
    /// One process instance uses exactly one namespace for its lifetime,
    /// so multiple tenants can share a remote store without colliding.
    pub namespace: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - Namespace for all derived keys (default: "app")
    pub fn from_env() -> Self {
        Self {
            namespace: env::var("CACHE_NAMESPACE").unwrap_or_else(|_| "app".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "app".to_string(),
        }
    }
}

// == Install Mode ==
/// Process-wide installation-mode flag.
///
/// While active, the cache skips every remote read, write, delete and
/// key query and serves from the local mapping alone. The host owns the
/// handle and flips it during bootstrap or migration windows; the cache
/// only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct InstallMode {
    active: Arc<AtomicBool>,
}

impl InstallMode {
    // == Constructor ==
    /// Creates a new flag in the inactive state.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Activates or deactivates installation mode.
    ///
    /// Visible to every clone of this handle.
    pub fn set(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    // == Is Active ==
    /// Returns true while installation mode is active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
