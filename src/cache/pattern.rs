//! Pattern Resolver Module
//!
//! Expands a key prefix into the concrete set of matching
//! fully-qualified keys, preferring the remote store's native glob
//! query and falling back to a scan of the local mapping when the
//! store is unreachable.

use regex::Regex;

use crate::cache::store::NamespacedCache;
use crate::cache::WILDCARD;

// == Pattern Compilation ==
/// Compiles a derived key pattern into the regex used for local scans.
///
/// Every character of the pattern is matched literally (the namespace
/// separator included), except the wildcard which becomes zero or more
/// word characters. Matching is anchored at the start of the key.
pub(crate) fn compile_key_pattern(pattern: &str) -> Regex {
    let source = format!("^{}", regex::escape(pattern).replace(r"\*", r"[\w]*"));
    Regex::new(&source).expect("escaped pattern is always a valid regex")
}

impl NamespacedCache {
    // == Resolve Keys ==
    /// Returns every fully-qualified key matching `prefix` plus the
    /// wildcard.
    ///
    /// The remote store answers when reachable (skipped in installation
    /// mode); otherwise the local mapping is scanned with an equivalent
    /// pattern. Ordering follows whichever source answered, with no
    /// guarantee across tiers.
    pub async fn resolve_keys(&self, prefix: &str) -> Vec<String> {
        let mut pattern = self.keys.qualify(prefix);
        pattern.push(WILDCARD);

        if !self.install_mode.is_active() {
            match self.remote.keys(pattern.as_bytes()).await {
                Ok(keys) => {
                    return keys
                        .into_iter()
                        .map(|key| String::from_utf8_lossy(&key).into_owned())
                        .collect();
                }
                Err(err) => {
                    Self::log_remote_failure("keys", &pattern, &err);
                    self.local.write().await.stats_mut().record_degraded();
                }
            }
        }

        let matcher = compile_key_pattern(&pattern);
        let local = self.local.read().await;
        local
            .keys()
            .filter(|key| matcher.is_match(key))
            .cloned()
            .collect()
    }
}
