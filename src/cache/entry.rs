//! Cache Entry Module
//!
//! Defines what the local tier stores per fully-qualified key.

use serde_json::Value;

// == Cache Entry ==
/// A local-tier slot: either a decoded value, or an explicit record
/// that the key has no value so a repeated read does not query the
/// remote store again within this process.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    /// A decoded value
    Present(Value),
    /// Negative marker: the key is known to have no value
    Absent,
}

impl CacheEntry {
    // == Value ==
    /// Returns the contained value, or None for the negative marker.
    pub fn value(&self) -> Option<&Value> {
        match self {
            CacheEntry::Present(value) => Some(value),
            CacheEntry::Absent => None,
        }
    }

    // == Into Value ==
    /// Consumes the entry, returning the contained value if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            CacheEntry::Present(value) => Some(value),
            CacheEntry::Absent => None,
        }
    }

    // == Is Absent ==
    /// Returns true when this entry is the negative marker.
    pub fn is_absent(&self) -> bool {
        matches!(self, CacheEntry::Absent)
    }
}
