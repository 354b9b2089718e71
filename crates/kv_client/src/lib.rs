//! Crate for talking to a lexicographically ordered key-value store through its
//! HTTP/JSON gateway.
//!
//! The gateway exposes the store's range, put and deleterange verbs as `POST`
//! endpoints under `/v3/kv/`, with keys and values carried as base64 strings.
//! This crate provides:
//!
//! - [`key_codec`], the text ⇄ base64 conversion used for every key and value;
//! - [`range_bound`], the bound computation for prefix scans;
//! - [`models`], the request and response bodies;
//! - [`KvClient`], a thin client issuing exactly one HTTP request per call.
//!
//! The client never retries. Transport failures and non-success statuses are
//! reported as distinct [`Error`] variants so callers can apply their own policy.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

pub mod errors;
pub use errors::{CodecError, Error, Result};

pub mod key_codec;
pub use key_codec::{DecodeTier, Decoded};

pub mod models;
pub use models::{
    DeleteRangeRequest, DeleteRangeResponse, KeyValue, PutRequest, RangeRequest, RangeResponse,
};

pub mod range_bound;
pub use range_bound::{KeyRange, RangeEndStrategy};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

const RANGE_PATH: &str = "v3/kv/range";
const PUT_PATH: &str = "v3/kv/put";
const DELETE_RANGE_PATH: &str = "v3/kv/deleterange";

/// A client for the key-value gateway.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct KvClient {
    http: reqwest::Client,
    base_url: Url,
}

impl KvClient {
    /// Creates a client for the gateway at `base_url` using the given HTTP client.
    ///
    /// Gateway paths are resolved relative to `base_url`, so a gateway mounted
    /// below a path (e.g. `https://proxy.local/etcd/`) keeps that path.
    pub fn new(base_url: Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// Creates a client with its own HTTP client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root URL of the gateway, e.g. `http://127.0.0.1:2379`.
    /// * `timeout` - Optional per-request timeout enforced by the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the HTTP client cannot be initialised.
    pub fn with_timeout(base_url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Transport)?;
        Ok(Self::new(base_url, http))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issues a range query.
    ///
    /// # Errors
    ///
    /// * `Error::Transport` - the request could not be sent or no response arrived
    /// * `Error::BackendStatus` - the gateway answered with a non-success status
    /// * `Error::Deserialization` - the response body is not a range response
    #[instrument(skip(self, request), fields(limit = ?request.limit))]
    pub async fn range(&self, request: &RangeRequest) -> Result<RangeResponse> {
        let body = self.post(RANGE_PATH, request).await?;
        let response: RangeResponse = parse_body(&body)?;

        debug!(
            returned = response.kvs.len(),
            count = response.total_count(),
            more = response.more,
            "Range query completed"
        );
        Ok(response)
    }

    /// Writes a single key, overwriting any existing value.
    ///
    /// The acknowledgement body is not inspected beyond the HTTP status.
    #[instrument(skip(self, request))]
    pub async fn put(&self, request: &PutRequest) -> Result<()> {
        self.post(PUT_PATH, request).await?;
        debug!("Put completed");
        Ok(())
    }

    /// Deletes a key (or key range).
    ///
    /// Deleting a key that does not exist succeeds with a zero count.
    #[instrument(skip(self, request))]
    pub async fn delete_range(&self, request: &DeleteRangeRequest) -> Result<DeleteRangeResponse> {
        let body = self.post(DELETE_RANGE_PATH, request).await?;

        // The delete already happened; an unreadable acknowledgement is not a failure.
        let response = parse_body::<DeleteRangeResponse>(&body).unwrap_or_else(|e| {
            warn!(error = %e, "Could not read deleterange acknowledgement");
            DeleteRangeResponse::default()
        });

        debug!(deleted = response.deleted_count(), "Delete range completed");
        Ok(response)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = self.base_url.join(path)?;
        debug!(url = %url, "Sending key-value request");

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(path = path, error = %e, "Key-value request could not be sent");
                Error::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                path = path,
                status = status.as_u16(),
                "Key-value backend returned an error status"
            );
            return Err(Error::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        response.text().await.map_err(Error::Transport)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
