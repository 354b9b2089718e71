//! Client-side store for plugin configuration templates.
//!
//! Templates are schema-agnostic JSON records identified by a caller-chosen
//! id. They are persisted in a lexicographically ordered key-value backend
//! under `"{prefix}/{id}"` (default prefix `/plugin_templates`) and accessed
//! through the backend's HTTP gateway.
//!
//! # Examples
//!
//! ```no_run
//! use serde_json::json;
//! use template_store::{StoreConfig, Template, TemplateRepository, TemplateStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TemplateStore::new(StoreConfig::new("http://127.0.0.1:2379"))?;
//!
//! if !store.test_connection().await {
//!     eprintln!("backend unreachable");
//! }
//!
//! store
//!     .save_template(&Template::new("t1").with_field("name", json!("A")))
//!     .await?;
//!
//! let updated = store
//!     .update_template(Template::new("t1").with_field("name", json!("B")))
//!     .await?;
//! println!("updated at {:?}", updated.updated_at);
//!
//! for template in store.list_templates().await? {
//!     println!("{}", template.id);
//! }
//!
//! store.delete_template("t1").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub use config::StoreConfig;

pub mod errors;
pub use errors::{TemplateStoreError, TemplateStoreResult};

pub mod repository;
pub use repository::TemplateRepository;

pub mod store;
pub use store::TemplateStore;

pub mod template;
pub use template::Template;

pub use kv_client::RangeEndStrategy;
