//! # Models
//!
//! Request and response bodies of the key-value gateway's JSON API.
//!
//! Keys and values travel as base64 strings. 64-bit integers in responses are
//! rendered as JSON strings by the gateway, so they are kept as strings here
//! and only parsed where a caller needs the number. Fields the client never
//! reads are not modelled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::key_codec;
use crate::range_bound::KeyRange;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Body of `POST /v3/kv/range`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRequest {
    /// First key of the range (base64).
    pub key: String,

    /// Exclusive end of the range (base64). Absent for a single-key lookup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<String>,

    /// Maximum number of entries returned. Absent means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl RangeRequest {
    /// Looks up exactly one key.
    pub fn single(key: &str) -> Self {
        Self {
            key: key_codec::encode(key),
            range_end: None,
            limit: None,
        }
    }

    /// Scans a key range, returning at most `limit` entries.
    pub fn range(range: &KeyRange, limit: i64) -> Self {
        Self {
            key: key_codec::encode_bytes(&range.key),
            range_end: Some(key_codec::encode_bytes(&range.range_end)),
            limit: Some(limit),
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Body of `POST /v3/kv/put`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
}

impl PutRequest {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key_codec::encode(key),
            value: key_codec::encode(value),
        }
    }
}

/// Body of `POST /v3/kv/deleterange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRangeRequest {
    pub key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_end: Option<String>,
}

impl DeleteRangeRequest {
    /// Deletes exactly one key.
    pub fn single(key: &str) -> Self {
        Self {
            key: key_codec::encode(key),
            range_end: None,
        }
    }
}

/// A single stored entry as returned by the range verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Key (base64).
    pub key: String,

    /// Value (base64). The gateway omits it for empty values.
    #[serde(default)]
    pub value: String,

    /// Revision of the last modification, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_revision: Option<String>,
}

impl KeyValue {
    /// Decodes the key into text.
    pub fn decoded_key(&self) -> Result<String, CodecError> {
        key_codec::decode(&self.key)
    }
}

/// Response of the range verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeResponse {
    /// Matching entries. The gateway omits the field when nothing matches.
    #[serde(default)]
    pub kvs: Vec<KeyValue>,

    /// Total number of keys in the range, which may exceed `kvs.len()` when a
    /// limit applies.
    #[serde(default)]
    pub count: Option<String>,

    /// Set when more keys exist beyond the returned page.
    #[serde(default)]
    pub more: bool,
}

impl RangeResponse {
    /// Total number of keys in the range as reported by the backend.
    pub fn total_count(&self) -> u64 {
        self.count
            .as_deref()
            .and_then(|count| count.parse().ok())
            .unwrap_or(self.kvs.len() as u64)
    }
}

/// Response of the deleterange verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRangeResponse {
    /// Number of deleted keys, as a decimal string. Omitted when zero.
    #[serde(default)]
    pub deleted: Option<String>,
}

impl DeleteRangeResponse {
    pub fn deleted_count(&self) -> u64 {
        self.deleted
            .as_deref()
            .and_then(|deleted| deleted.parse().ok())
            .unwrap_or(0)
    }
}
