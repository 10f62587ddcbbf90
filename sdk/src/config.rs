//! Client configuration: base URL, credentials, timeout.
//!
//! Configuration is immutable once the client is built; credentials are
//! attached to every request and never renegotiated per call.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_BASE_URL: &str = "VIGIL_BASE_URL";
const ENV_API_TOKEN: &str = "VIGIL_API_TOKEN";
const ENV_API_KEY: &str = "VIGIL_API_KEY";

/// How the client authenticates against the API.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Sent as `Authorization: Bearer <token>`.
    Bearer(String),
    /// Sent as `X-Api-Key: <key>`.
    ApiKey(String),
}

/// Immutable client configuration shared by all requests.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) base_url: String,
    pub(crate) credentials: Credentials,
    pub(crate) timeout: Duration,
}

impl Config {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from the process environment.
    ///
    /// `VIGIL_BASE_URL` is required. `VIGIL_API_TOKEN` takes precedence over
    /// `VIGIL_API_KEY` when both are set.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_BASE_URL)
            .map_err(|_| Error::Config(format!("{ENV_BASE_URL} is not set")))?;
        let credentials = if let Ok(token) = std::env::var(ENV_API_TOKEN) {
            Credentials::Bearer(token)
        } else if let Ok(key) = std::env::var(ENV_API_KEY) {
            Credentials::ApiKey(key)
        } else {
            return Err(Error::Config(format!(
                "neither {ENV_API_TOKEN} nor {ENV_API_KEY} is set"
            )));
        };
        Ok(Self::new(&base_url, credentials))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
