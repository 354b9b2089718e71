//! Range bounds for prefix scans.
//!
//! The gateway's range verb returns every key `k` with `key <= k < range_end`
//! in byte-wise lexicographic order. Scanning all keys that start with a prefix
//! therefore needs an exclusive upper bound that is greater than every key with
//! the prefix and not greater than any key without it. The smallest such bound
//! is the lexicographic successor of the prefix.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "range_bound_tests.rs"]
mod tests;

/// Suffix appended to the prefix by [`RangeEndStrategy::SentinelSuffix`].
pub const SENTINEL_SUFFIX: &str = "z";

/// A `range_end` of a single zero byte asks the backend for all keys `>= key`.
pub const OPEN_RANGE_END: &[u8] = &[0x00];

/// How the exclusive upper bound of a prefix scan is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeEndStrategy {
    /// Increment the last byte of the prefix. Exact for every key.
    #[default]
    Successor,

    /// Append [`SENTINEL_SUFFIX`] to the prefix.
    ///
    /// Keys whose remainder after the prefix starts with a byte at or after
    /// `z` (for example `~draft` or any non-ASCII character) fall outside this
    /// bound and are silently missing from listings. Only use this to match
    /// deployments that already depend on its exact request shape.
    SentinelSuffix,
}

/// An inclusive lower bound and exclusive upper bound over raw key bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRange {
    pub key: Vec<u8>,
    pub range_end: Vec<u8>,
}

impl KeyRange {
    /// Builds the range covering all keys that start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kv_client::range_bound::{KeyRange, RangeEndStrategy};
    ///
    /// let range = KeyRange::prefix("/plugin_templates/", RangeEndStrategy::Successor);
    /// assert_eq!(range.range_end, b"/plugin_templates0".to_vec());
    /// ```
    pub fn prefix(prefix: &str, strategy: RangeEndStrategy) -> Self {
        let key = prefix.as_bytes().to_vec();
        let range_end = match strategy {
            RangeEndStrategy::Successor => {
                lex_successor(&key).unwrap_or_else(|| OPEN_RANGE_END.to_vec())
            }
            RangeEndStrategy::SentinelSuffix => format!("{prefix}{SENTINEL_SUFFIX}").into_bytes(),
        };
        Self { key, range_end }
    }

    /// Returns `true` if the backend would include `key` in a scan of this range.
    pub fn contains(&self, key: &[u8]) -> bool {
        if key < self.key.as_slice() {
            return false;
        }
        self.range_end == OPEN_RANGE_END || key < self.range_end.as_slice()
    }
}

/// Computes the smallest byte sequence greater than every sequence starting with `bytes`.
///
/// Trailing `0xFF` bytes cannot be incremented and are dropped before the
/// preceding byte is incremented. Returns `None` if `bytes` is empty or
/// consists only of `0xFF`, in which case no finite bound exists.
pub fn lex_successor(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut result = bytes.to_vec();
    while let Some(last) = result.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return Some(result);
        }
        result.pop();
    }
    None
}
