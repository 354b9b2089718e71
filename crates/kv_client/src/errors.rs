//! Error types for key-value client operations.
//!
//! This module defines the error types that can occur when talking to the
//! key-value backend through its HTTP gateway. Transport failures, non-success
//! status codes and malformed responses are kept apart so that callers can
//! decide which of them are fatal. Decoding individual keys and values is left
//! to the caller and reported as [`CodecError`].

use std::string::FromUtf8Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors produced while converting between logical text and the base64 wire form.
///
/// These are never swallowed by the codec itself. Callers that need to stay
/// compatible with legacy records use [`crate::key_codec::decode_lenient`],
/// which reports the fallback tier it ended up using instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The wire value is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded bytes are not a valid UTF-8 sequence.
    #[error("Decoded payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Errors that can occur during key-value client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use kv_client::Error;
///
/// match client.range(&request).await {
///     Ok(response) => println!("{} entries", response.kvs.len()),
///     Err(Error::Transport(e)) => eprintln!("Backend unreachable: {}", e),
///     Err(Error::BackendStatus { status, body }) => eprintln!("{}: {}", status, body),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or no response was received.
    ///
    /// This covers connection refusals, DNS failures, timeouts imposed by the
    /// underlying HTTP client and connections dropped mid-response.
    #[error("Failed to reach the key-value backend: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    ///
    /// The status code and the raw response body are kept for diagnostics.
    #[error("Key-value backend responded with status {status}: {body}")]
    BackendStatus { status: u16, body: String },

    /// The response body is not the JSON document the gateway is expected to return.
    #[error("Failed to deserialize key-value backend response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The endpoint URL for a gateway verb could not be built.
    #[error("Invalid key-value backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` when the backend produced an HTTP response of any kind.
    ///
    /// Only [`Error::Transport`] means that nothing came back.
    pub fn backend_responded(&self) -> bool {
        !matches!(self, Error::Transport(_) | Error::InvalidUrl(_))
    }
}

/// Result type for key-value client operations.
pub type Result<T> = std::result::Result<T, Error>;
