//! Template store error types.
//!
//! Domain-specific errors for reading and writing template records. Failures
//! of the underlying key-value client are translated into these variants so
//! that callers never need to depend on the transport crate.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Template store errors.
///
/// Single-record operations surface every variant. Listing swallows
/// `Decode` and `Parse` failures of individual entries and degrades an
/// unavailable backend to an empty result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateStoreError {
    #[error("Failed to reach the template backend: {reason}")]
    Transport { reason: String },

    #[error("Template backend responded with status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Failed to decode stored value for key '{key}': {reason}")]
    Decode { key: String, reason: String },

    #[error("Stored value for key '{key}' is not a valid template: {reason}")]
    Parse { key: String, reason: String },

    #[error("Template not found: {id}")]
    NotFound { id: String },

    #[error("Invalid template id: {reason}")]
    InvalidTemplateId { reason: String },

    #[error("Failed to serialize template '{id}': {reason}")]
    Serialization { id: String, reason: String },

    #[error("Template backend returned an unreadable response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },
}

impl From<kv_client::Error> for TemplateStoreError {
    fn from(error: kv_client::Error) -> Self {
        match error {
            kv_client::Error::Transport(e) => TemplateStoreError::Transport {
                reason: e.to_string(),
            },
            kv_client::Error::BackendStatus { status, body } => {
                TemplateStoreError::BackendStatus { status, body }
            }
            kv_client::Error::Deserialization(e) => TemplateStoreError::InvalidResponse {
                reason: e.to_string(),
            },
            kv_client::Error::InvalidUrl(e) => TemplateStoreError::InvalidConfiguration {
                field: "endpoint".to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Result type alias for template store operations.
pub type TemplateStoreResult<T> = Result<T, TemplateStoreError>;
