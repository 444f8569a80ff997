//! Cache Statistics Module
//!
//! Tracks cache effectiveness across the local and remote tiers.

use serde::Serialize;

// == Cache Stats ==
/// Counters for cache behaviour across both tiers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads answered by the local mapping (including negative markers)
    pub local_hits: u64,
    /// Reads answered by the remote store
    pub remote_hits: u64,
    /// Reads that found no value in either tier
    pub misses: u64,
    /// Values produced by a generator on miss
    pub generated: u64,
    /// Remote operations skipped or failed, served locally instead
    pub degraded: u64,
    /// Current number of entries in the local mapping
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the combined hit rate across both tiers.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.local_hits + self.remote_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    // == Record Local Hit ==
    /// Increments the local-hit counter.
    pub fn record_local_hit(&mut self) {
        self.local_hits += 1;
    }

    // == Record Remote Hit ==
    /// Increments the remote-hit counter.
    pub fn record_remote_hit(&mut self) {
        self.remote_hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Generated ==
    /// Increments the generator-invocation counter.
    pub fn record_generated(&mut self) {
        self.generated += 1;
    }

    // == Record Degraded ==
    /// Increments the degraded-operation counter.
    pub fn record_degraded(&mut self) {
        self.degraded += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
