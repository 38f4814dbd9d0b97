//! Client configuration.
//!
//! Everything derives from one base URL: the REST root is the base plus a
//! fixed `/api/v1` prefix, and the event stream URL is the same host with
//! the scheme switched to its WebSocket counterpart - a secure base yields a
//! secure stream.

use thiserror::Error;
use url::Url;

/// Fixed REST path prefix on the backend.
pub const API_PREFIX: &str = "/api/v1/";

/// Fixed well-known path of the event stream endpoint.
pub const EVENTS_PATH: &str = "/ws";

/// Environment variable naming the backend base URL.
pub const ENV_API_URL: &str = "HAVEN_API_URL";

/// Environment variable carrying the opaque sign-in identifier.
pub const ENV_GOOGLE_CLIENT_ID: &str = "HAVEN_GOOGLE_CLIENT_ID";

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for one sync session.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Backend base URL (`http://host:port` or `https://host:port`).
    pub base_url: Url,
    /// Opaque identifier consumed by the sign-in flow; never interpreted.
    pub google_client_id: Option<String>,
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("base URL scheme must be http or https, got {0}")]
    UnsupportedScheme(String),
}

impl SyncConfig {
    /// Build a config around a backend base URL.
    pub fn new(base_url: Url) -> Result<Self, ConfigError> {
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }
        Ok(Self {
            base_url,
            google_client_id: None,
        })
    }

    /// Build from the environment, falling back to the local default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(Url::parse(&base)?)?;
        config.google_client_id = std::env::var(ENV_GOOGLE_CLIENT_ID).ok();
        Ok(config)
    }

    /// REST root: base URL plus the fixed `/api/v1` prefix.
    pub fn api_root(&self) -> Result<Url, ConfigError> {
        Ok(self.base_url.join(API_PREFIX)?)
    }

    /// Event stream URL: same host/port, `/ws` path, WebSocket scheme
    /// matching the base scheme's security (`https` → `wss`).
    pub fn events_url(&self) -> Result<Url, ConfigError> {
        let mut url = self.base_url.join(EVENTS_PATH)?;
        let scheme = match self.base_url.scheme() {
            "https" => "wss",
            _ => "ws",
        };
        if url.set_scheme(scheme).is_err() {
            return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_base_yields_secure_stream() {
        let config = SyncConfig::new(Url::parse("https://haven.example:8443").expect("url"))
            .expect("config");
        assert_eq!(
            config.events_url().expect("events url").as_str(),
            "wss://haven.example:8443/ws"
        );
    }

    #[test]
    fn test_plain_base_yields_plain_stream() {
        let config =
            SyncConfig::new(Url::parse("http://localhost:8000").expect("url")).expect("config");
        assert_eq!(
            config.events_url().expect("events url").as_str(),
            "ws://localhost:8000/ws"
        );
    }

    #[test]
    fn test_api_root_carries_fixed_prefix() {
        let config =
            SyncConfig::new(Url::parse("http://localhost:8000").expect("url")).expect("config");
        assert_eq!(
            config.api_root().expect("api root").as_str(),
            "http://localhost:8000/api/v1/"
        );
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = SyncConfig::new(Url::parse("ftp://nope").expect("url"));
        assert!(matches!(err, Err(ConfigError::UnsupportedScheme(_))));
    }
}
