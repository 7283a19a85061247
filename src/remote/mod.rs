//! Client for the remote JSON document store holding the credential list.
//!
//! `GET {endpoint}/latest` returns `{ "record": [...] }` and `PUT {endpoint}`
//! overwrites the whole document. Both carry the `X-Master-Key` header.
//!
//! Items are handled as raw JSON so entries written by other clients survive a
//! read-modify-write even when they do not match [`crate::storage::CredentialEntry`].

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::{fmt, future::Future, pin::Pin, time::Duration};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

pub const MASTER_KEY_HEADER: &str = "X-Master-Key";

/// Default request timeout applied to both calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of error body characters kept in [`RemoteError::Status`].
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid remote store endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("remote store unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote store returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("remote store returned an undecodable document: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// A document holding the credential list as a JSON array.
pub trait DocumentStore: Send + Sync {
    /// Current list. A document without an array record is empty.
    fn fetch(&self) -> StoreFuture<'_, Vec<Value>>;

    /// Overwrite the whole list.
    fn replace<'a>(&'a self, entries: &'a [Value]) -> StoreFuture<'a, ()>;
}

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    endpoint: String,
    master_key: SecretString,
}

impl RemoteStore {
    /// Build a client for `endpoint`.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        master_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let url = Url::parse(endpoint.trim())
            .map_err(|err| RemoteError::InvalidEndpoint(format!("{endpoint}: {err}")))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(RemoteError::InvalidEndpoint(format!(
                    "unsupported scheme {scheme}"
                )))
            }
        }

        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: url.as_str().trim_end_matches('/').to_string(),
            master_key,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current credential list.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status or a body
    /// that is not JSON.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch(&self) -> Result<Vec<Value>, RemoteError> {
        let response = self
            .client
            .get(format!("{}/latest", self.endpoint))
            .header(MASTER_KEY_HEADER, self.master_key.expose_secret())
            .send()
            .await?;

        let response = check_status(response).await?;
        let body = response.bytes().await?;
        let document: Value = serde_json::from_slice(&body)?;

        let entries = match document.get("record") {
            Some(Value::Array(items)) => items.clone(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                warn!("remote record is not an array, treating it as empty: {}", other);
                Vec::new()
            }
        };

        debug!("remote credential list holds {} entries", entries.len());

        Ok(entries)
    }

    /// Overwrite the remote document with `entries`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self, entries), fields(endpoint = %self.endpoint, entries = entries.len()))]
    pub async fn replace(&self, entries: &[Value]) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(&self.endpoint)
            .header(MASTER_KEY_HEADER, self.master_key.expose_secret())
            .json(entries)
            .send()
            .await?;

        check_status(response).await?;

        Ok(())
    }
}

impl DocumentStore for RemoteStore {
    fn fetch(&self) -> StoreFuture<'_, Vec<Value>> {
        Box::pin(RemoteStore::fetch(self))
    }

    fn replace<'a>(&'a self, entries: &'a [Value]) -> StoreFuture<'a, ()> {
        Box::pin(RemoteStore::replace(self, entries))
    }
}

impl fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStore")
            .field("endpoint", &self.endpoint)
            .field("master_key", &"***")
            .finish_non_exhaustive()
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status,
        message: error_message(&body),
    })
}

/// Prefer the store's `message` field, fall back to the truncated raw body.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = json["message"].as_str() {
            return message.to_string();
        }
    }
    body.chars().take(MAX_ERROR_CHARS).collect()
}
