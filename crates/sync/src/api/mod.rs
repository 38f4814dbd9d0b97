//! The REST resource fetcher.
//!
//! A thin request helper with a fixed base path, JSON encode/decode, and
//! uniform error signaling. No built-in retry, no timeout, no caching:
//! each call is a single best-effort round trip, and callers decide whether
//! to retry, ignore, or surface a failure.

mod endpoints;
mod port;

pub use port::ApiPort;
#[cfg(test)]
pub use port::MockApiPort;

use std::sync::RwLock;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::{ConfigError, SyncConfig};

/// Request failure taxonomy.
///
/// A non-success status is a generic request error carrying the code;
/// network failures and body decode failures are distinguished so callers
/// can log them apart, but all three mean "no state change occurred".
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed with status {0}")]
    Status(StatusCode),
    #[error("request transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("response decode error: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("invalid endpoint path: {0}")]
    Path(#[from] url::ParseError),
}

/// JSON request helper bound to the backend's `/api/v1` root.
pub struct ApiClient {
    http: Client,
    api_root: Url,
    /// Opaque OAuth access token, attached as a bearer header once the
    /// consumer signs in. Never interpreted client-side.
    access_token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: &SyncConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: Client::new(),
            api_root: config.api_root()?,
            access_token: RwLock::new(None),
        })
    }

    /// Store the opaque access token attached to every subsequent request.
    pub fn set_access_token(&self, token: impl Into<String>) {
        *write_token(&self.access_token) = Some(token.into());
    }

    /// Drop the stored token (sign-out).
    pub fn clear_access_token(&self) {
        *write_token(&self.access_token) = None;
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, None::<&()>).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, None::<&()>).await
    }

    /// Escape hatch for call sites needing non-default options (extra
    /// headers, query parameters): a builder pre-wired with the resolved
    /// URL and the bearer credential. Finish it with
    /// [`execute`](Self::execute).
    pub fn builder(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.api_root.join(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(token) = read_token(&self.access_token).as_deref() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Fire a prepared request: one best-effort round trip, status checked,
    /// JSON body decoded.
    pub async fn execute<T: DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        response.json().await.map_err(ApiError::Decode)
    }

    async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut builder = self.builder(method, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::execute(builder).await
    }
}

fn read_token(lock: &RwLock<Option<String>>) -> std::sync::RwLockReadGuard<'_, Option<String>> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_token(lock: &RwLock<Option<String>>) -> std::sync::RwLockWriteGuard<'_, Option<String>> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}
