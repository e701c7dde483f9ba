//! Descriptor fingerprints
//!
//! A derived descriptor is pinned to the model version it came from. The
//! fingerprint changes whenever any rendered key of the descriptor does,
//! including field order.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 fingerprint of a rendered descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    /// Fingerprint of a JSON value in its serialized field order
    pub fn from_json(value: &serde_json::Value) -> Self {
        // Serializing a Value cannot fail: all keys are strings
        let rendered = serde_json::to_vec(value).unwrap_or_default();
        Self::from_bytes(&rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for logs
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}
