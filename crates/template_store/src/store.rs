//! Template store backed by the key-value gateway.
//!
//! Every template lives under `"{prefix}/{id}"`. Values are the JSON form of
//! the template, base64 encoded on the wire.

use async_trait::async_trait;
use chrono::Utc;
use kv_client::key_codec::{self, DecodeTier};
use kv_client::{DeleteRangeRequest, KvClient, PutRequest, RangeRequest};
use tracing::{debug, info, instrument, warn};

use crate::config::{validate_list_limit, StoreConfig};
use crate::{Template, TemplateRepository, TemplateStoreError, TemplateStoreResult};

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// Template store talking to the key-value gateway.
///
/// The endpoint and key prefix are fixed at construction. Use
/// [`TemplateStore::rebuild`] to point at a different backend or namespace.
///
/// `update_template` reads the record and then writes it in two separate
/// requests. A delete that lands between the two is undone by the write;
/// the backend offers no transaction to prevent that here.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    client: KvClient,
    config: StoreConfig,
}

impl TemplateStore {
    /// Creates a store from a validated configuration.
    ///
    /// # Errors
    ///
    /// * `TemplateStoreError::InvalidConfiguration` - the configuration is invalid
    /// * `TemplateStoreError::Transport` - the HTTP client could not be created
    pub fn new(config: StoreConfig) -> TemplateStoreResult<Self> {
        let endpoint = config.validate()?;
        let client = KvClient::with_timeout(endpoint, config.request_timeout())?;

        info!(
            endpoint = %client.base_url(),
            key_prefix = %config.key_prefix,
            "Template store created"
        );
        Ok(Self { client, config })
    }

    /// Creates a new store from `config`, leaving this one untouched.
    pub fn rebuild(&self, config: StoreConfig) -> TemplateStoreResult<Self> {
        Self::new(config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Changes the maximum number of entries returned by listings.
    pub fn set_list_limit(&mut self, list_limit: i64) -> TemplateStoreResult<()> {
        validate_list_limit(list_limit)?;
        self.config.list_limit = list_limit;
        Ok(())
    }

    fn template_key(&self, id: &str) -> TemplateStoreResult<String> {
        if id.trim().is_empty() {
            return Err(TemplateStoreError::InvalidTemplateId {
                reason: "id must not be empty or whitespace".to_string(),
            });
        }
        Ok(self.config.template_key(id))
    }
}

#[async_trait]
impl TemplateRepository for TemplateStore {
    #[instrument(skip(self), fields(key_prefix = %self.config.key_prefix))]
    async fn list_templates(&self) -> TemplateStoreResult<Vec<Template>> {
        let range = self.config.listing_range();
        let request = RangeRequest::range(&range, self.config.list_limit);

        let response = match self.client.range(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Template backend unavailable, returning an empty listing");
                return Ok(Vec::new());
            }
        };

        if response.more {
            warn!(
                limit = self.config.list_limit,
                total = response.total_count(),
                "Template listing truncated at the list limit"
            );
        }

        let mut templates = Vec::with_capacity(response.kvs.len());
        for entry in response.kvs {
            let key = entry.decoded_key().unwrap_or_else(|_| entry.key.clone());
            match decode_template(&key, &entry.value) {
                Ok(template) => templates.push(template),
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable template entry"),
            }
        }

        debug!(count = templates.len(), "Listed templates");
        Ok(templates)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_template(&self, id: &str) -> TemplateStoreResult<Option<Template>> {
        let key = self.template_key(id)?;
        let response = self.client.range(&RangeRequest::single(&key)).await?;

        let Some(entry) = response.kvs.into_iter().next() else {
            debug!(key = %key, "Template not present");
            return Ok(None);
        };

        debug!(key = %key, mod_revision = ?entry.mod_revision, "Template loaded");
        decode_template(&key, &entry.value).map(Some)
    }

    #[instrument(skip(self, template), fields(id = %template.id))]
    async fn save_template(&self, template: &Template) -> TemplateStoreResult<()> {
        let key = self.template_key(&template.id)?;
        let value =
            serde_json::to_string(template).map_err(|e| TemplateStoreError::Serialization {
                id: template.id.clone(),
                reason: e.to_string(),
            })?;

        self.client.put(&PutRequest::new(&key, &value)).await?;

        info!(key = %key, "Template saved");
        Ok(())
    }

    #[instrument(skip(self, template), fields(id = %template.id))]
    async fn update_template(&self, mut template: Template) -> TemplateStoreResult<Template> {
        if self.get_template(&template.id).await?.is_none() {
            warn!("Refusing to update a template that does not exist");
            return Err(TemplateStoreError::NotFound { id: template.id });
        }

        template.touch(Utc::now());
        self.save_template(&template).await?;
        Ok(template)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_template(&self, id: &str) -> TemplateStoreResult<()> {
        let key = self.template_key(id)?;
        let response = self
            .client
            .delete_range(&DeleteRangeRequest::single(&key))
            .await?;

        info!(key = %key, deleted = response.deleted_count(), "Template deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn test_connection(&self) -> bool {
        let request = RangeRequest::single(&self.config.probe_key()).with_limit(1);

        match self.client.range(&request).await {
            Ok(_) => true,
            Err(e) if e.backend_responded() => {
                debug!(error = %e, "Backend reachable but answered with an error");
                true
            }
            Err(e) => {
                warn!(error = %e, "Template backend unreachable");
                false
            }
        }
    }
}

/// Turns a stored wire value into a template.
///
/// Values written by older clients may be unpadded, encoded per code point or
/// not encoded at all; the lenient decoder recovers those. A passthrough value
/// that is not JSON is a decode failure, anything decoded that is not a
/// template is a parse failure.
fn decode_template(key: &str, wire: &str) -> TemplateStoreResult<Template> {
    let decoded = key_codec::decode_lenient(wire);
    if decoded.tier != DecodeTier::Primary {
        debug!(key = %key, tier = ?decoded.tier, "Stored value needed a fallback decoder");
    }

    match serde_json::from_str::<Template>(&decoded.text) {
        Ok(template) => Ok(template),
        Err(e) if decoded.was_decoded() => Err(TemplateStoreError::Parse {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(TemplateStoreError::Decode {
            key: key.to_string(),
            reason: "value is neither base64 nor a JSON document".to_string(),
        }),
    }
}
