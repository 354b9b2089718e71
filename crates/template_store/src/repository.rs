//! Template repository interface.
//!
//! # Architecture
//!
//! ```text
//! CLI / hosting UI
//!     ↓ depends on (abstraction)
//! TemplateRepository trait
//!     ↑ implemented by
//! TemplateStore (key-value gateway)
//!     ↓ uses
//! kv_client::KvClient
//! ```

use async_trait::async_trait;

use crate::{Template, TemplateStoreResult};

/// Interface for persisting templates.
///
/// Implementations must be thread-safe (`Send + Sync`). Each method performs
/// its work against the backing store directly; there is no cache, so every
/// read observes the latest write the store has accepted.
///
/// # Examples
///
/// ```no_run
/// use template_store::{StoreConfig, Template, TemplateRepository, TemplateStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = TemplateStore::new(StoreConfig::new("http://127.0.0.1:2379"))?;
///
/// store.save_template(&Template::new("t1")).await?;
/// let loaded = store.get_template("t1").await?;
/// assert!(loaded.is_some());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Lists all stored templates.
    ///
    /// Entries that cannot be decoded or parsed are left out, and an
    /// unreachable backend yields an empty list. This never fails for
    /// backend reasons.
    async fn list_templates(&self) -> TemplateStoreResult<Vec<Template>>;

    /// Loads a single template, returning `None` if no template has this id.
    ///
    /// # Errors
    ///
    /// * `TemplateStoreError::Transport` - backend not reachable
    /// * `TemplateStoreError::BackendStatus` - backend answered with an error status
    /// * `TemplateStoreError::Decode` - stored value is neither base64 nor JSON
    /// * `TemplateStoreError::Parse` - stored value decoded but is not a template
    async fn get_template(&self, id: &str) -> TemplateStoreResult<Option<Template>>;

    /// Creates or overwrites a template.
    async fn save_template(&self, template: &Template) -> TemplateStoreResult<()>;

    /// Overwrites an existing template, refreshing its `updated_at`.
    ///
    /// Returns the record as written.
    ///
    /// # Errors
    ///
    /// * `TemplateStoreError::NotFound` - no template with this id exists;
    ///   nothing is written
    async fn update_template(&self, template: Template) -> TemplateStoreResult<Template>;

    /// Deletes a template. Deleting a missing template succeeds.
    async fn delete_template(&self, id: &str) -> TemplateStoreResult<()>;

    /// Returns `true` if the backend answered at all.
    async fn test_connection(&self) -> bool;
}
