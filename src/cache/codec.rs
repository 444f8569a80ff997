//! Codec Module
//!
//! Pluggable value encoding for the remote tier.
//!
//! The local mapping holds decoded values; only bytes cross the
//! remote-store boundary. Encode and decode failures surface as
//! `CacheError::Codec` rather than being folded into "value absent",
//! since a corrupt remote value is observably different from a miss.

use serde_json::Value;

use crate::error::{CacheError, Result};

// == Codec Trait ==
/// Encodes decoded values into the byte form stored remotely, and back.
///
/// Implementations must round-trip any value the host stores.
pub trait Codec: Send + Sync {
    /// Encodes a value into bytes for the remote store.
    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decodes bytes fetched from the remote store.
    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

// == JSON Codec ==
/// Default codec storing values as JSON text.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|err| CacheError::Codec(err.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(|err| CacheError::Codec(err.to_string()))
    }
}
