//! Store configuration.
//!
//! A [`StoreConfig`] is fixed when a [`crate::TemplateStore`] is built. The
//! endpoint and key prefix decide which records the store can see, so they
//! cannot change afterwards; build a new store from a new configuration
//! instead.
//!
//! # Example TOML
//!
//! ```toml
//! endpoint = "http://127.0.0.1:2379"
//! key_prefix = "/plugin_templates"
//! list_limit = 1000
//! request_timeout_secs = 5
//! range_end_strategy = "successor"
//! ```

use std::time::Duration;

use kv_client::{KeyRange, RangeEndStrategy};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{TemplateStoreError, TemplateStoreResult};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Default gateway endpoint of a local key-value node.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2379";

/// Default key prefix under which templates are stored.
pub const DEFAULT_KEY_PREFIX: &str = "/plugin_templates";

/// Default maximum number of entries returned by a listing.
pub const DEFAULT_LIST_LIMIT: i64 = 1000;

/// Key namespace owned by another consumer of the same backend.
pub const RESERVED_PREFIX: &str = "/apisix";

/// Last key segment used by the connection probe. No template uses it.
pub const PROBE_KEY_SEGMENT: &str = "__connection_probe__";

/// Configuration for a template store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root URL of the key-value gateway.
    #[serde(default = "StoreConfig::default_endpoint")]
    pub endpoint: String,

    /// Key prefix of all template records, without a trailing `/`.
    #[serde(default = "StoreConfig::default_key_prefix")]
    pub key_prefix: String,

    /// Maximum number of templates returned by a listing.
    #[serde(default = "StoreConfig::default_list_limit")]
    pub list_limit: i64,

    /// Per-request timeout. Unset means the HTTP client's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// How the upper bound of the listing scan is computed.
    #[serde(default)]
    pub range_end_strategy: RangeEndStrategy,
}

impl StoreConfig {
    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    fn default_key_prefix() -> String {
        DEFAULT_KEY_PREFIX.to_string()
    }

    fn default_list_limit() -> i64 {
        DEFAULT_LIST_LIMIT
    }

    /// Creates a configuration for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn with_list_limit(mut self, list_limit: i64) -> Self {
        self.list_limit = list_limit;
        self
    }

    /// Sets the per-request timeout, rounded up to whole seconds.
    ///
    /// A sub-second timeout becomes one second. `Duration::ZERO` is kept as
    /// zero and rejected by [`StoreConfig::validate`].
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        let whole = timeout.as_secs();
        let secs = if timeout.subsec_nanos() > 0 {
            whole.saturating_add(1)
        } else {
            whole
        };
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn with_range_end_strategy(mut self, strategy: RangeEndStrategy) -> Self {
        self.range_end_strategy = strategy;
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Checks the configuration and returns the parsed endpoint.
    ///
    /// # Errors
    ///
    /// Returns `TemplateStoreError::InvalidConfiguration` if:
    /// - the endpoint is not an `http` or `https` URL
    /// - the key prefix is empty, does not start with `/` or ends with `/`
    /// - the key prefix lies inside the reserved `/apisix` namespace
    /// - the list limit is not positive
    /// - the request timeout is zero
    pub fn validate(&self) -> TemplateStoreResult<Url> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| invalid("endpoint", format!("'{}': {}", self.endpoint, e)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(
                "endpoint",
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        let prefix = self.key_prefix.as_str();
        if prefix.len() < 2 || !prefix.starts_with('/') {
            return Err(invalid(
                "key_prefix",
                format!("'{prefix}' must start with '/' and name a namespace"),
            ));
        }
        if prefix.ends_with('/') {
            return Err(invalid(
                "key_prefix",
                format!("'{prefix}' must not end with '/'"),
            ));
        }
        if prefix == RESERVED_PREFIX || prefix.starts_with(&format!("{RESERVED_PREFIX}/")) {
            return Err(invalid(
                "key_prefix",
                format!("'{prefix}' is inside the reserved namespace '{RESERVED_PREFIX}'"),
            ));
        }

        validate_list_limit(self.list_limit)?;

        if self.request_timeout_secs == Some(0) {
            return Err(invalid(
                "request_timeout_secs",
                "must be at least one second".to_string(),
            ));
        }
        Ok(endpoint)
    }

    /// Backend key of the template with the given id.
    pub fn template_key(&self, id: &str) -> String {
        format!("{}/{}", self.key_prefix, id)
    }

    /// Key read by the connection probe.
    pub fn probe_key(&self) -> String {
        self.template_key(PROBE_KEY_SEGMENT)
    }

    /// Range covering every template key.
    ///
    /// The successor strategy scans `"{prefix}/"` so sibling namespaces that
    /// share the prefix text (`/plugin_templates_archive`) stay excluded. The
    /// sentinel strategy reproduces the legacy request exactly: the bare
    /// prefix and the prefix followed by `z`. That range also covers sibling
    /// namespaces whose next character sorts before `z`, such as
    /// `/plugin_templates_archive/...`.
    pub fn listing_range(&self) -> KeyRange {
        match self.range_end_strategy {
            RangeEndStrategy::Successor => KeyRange::prefix(
                &format!("{}/", self.key_prefix),
                RangeEndStrategy::Successor,
            ),
            RangeEndStrategy::SentinelSuffix => {
                KeyRange::prefix(&self.key_prefix, RangeEndStrategy::SentinelSuffix)
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            key_prefix: Self::default_key_prefix(),
            list_limit: Self::default_list_limit(),
            request_timeout_secs: None,
            range_end_strategy: RangeEndStrategy::default(),
        }
    }
}

pub(crate) fn validate_list_limit(list_limit: i64) -> TemplateStoreResult<()> {
    if list_limit <= 0 {
        return Err(invalid(
            "list_limit",
            format!("must be positive, got {list_limit}"),
        ));
    }
    Ok(())
}

fn invalid(field: &str, reason: String) -> TemplateStoreError {
    TemplateStoreError::InvalidConfiguration {
        field: field.to_string(),
        reason,
    }
}
