//! The dispatcher: executes a [`Request`] and extracts a typed payload.
//!
//! # Design
//! `Client` holds an immutable [`Config`] and one `reqwest::Client`; it
//! carries no mutable state, so concurrent callers need no external locking.
//! Every call follows the same path: build the URL and auth headers, race
//! the HTTP round-trip against the caller's cancellation token, then decode
//! the `{status, message, data, meta}` envelope into the call site's
//! concrete type. The dispatcher never retries — transport policy beyond
//! the configured timeout belongs to the caller.
//!
//! Extraction comes in two flavors, matching the API contract:
//! - [`Client::fetch_one`] is strict: a success response without `data` is a
//!   decode error, never a silent empty value.
//! - [`Client::fetch_list`] is lenient: missing `data` is an empty
//!   collection, a valid success outcome distinct from error.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::http::{Envelope, Request};
use crate::page::PageMeta;

/// Typed client for the Vigil API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Build a client from `VIGIL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    fn url_for(&self, req: &Request) -> Result<Url> {
        // Plain concatenation keeps any path prefix in the base URL intact,
        // which `Url::join` with absolute paths would drop.
        let separator = if req.path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!(
            "{}{}{}",
            self.config.base_url, separator, req.path
        ))
        .map_err(|e| Error::Config(format!("invalid request URL: {e}")))?;
        for (key, value) in &req.query {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match &self.config.credentials {
            Credentials::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| Error::Config("auth token is not a valid header value".into()))?;
                headers.insert(AUTHORIZATION, value);
            }
            Credentials::ApiKey(key) => {
                let value = HeaderValue::from_str(key)
                    .map_err(|_| Error::Config("API key is not a valid header value".into()))?;
                headers.insert(HeaderName::from_static("x-api-key"), value);
            }
        }
        Ok(headers)
    }

    /// Execute a request and decode the response envelope.
    ///
    /// Honors `cancel` end to end: a token cancelled before the call
    /// short-circuits without I/O, and one cancelled mid-flight aborts the
    /// round-trip promptly with [`Error::Cancelled`]. A 2xx response whose
    /// envelope reports `status: "error"` is surfaced as [`Error::Http`]
    /// with the server's message.
    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        req: Request,
        cancel: &CancellationToken,
    ) -> Result<Envelope<T>> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let url = self.url_for(&req)?;
        let headers = self.auth_headers()?;
        debug!(method = %req.method, %url, "dispatching request");

        let mut builder = self.http.request(req.method.clone(), url).headers(headers);
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = builder.send() => {
                response.map_err(|e| Error::Transport(e.to_string()))?
            }
        };

        let status = response.status();
        let body = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            body = response.text() => {
                body.map_err(|e| Error::Transport(e.to_string()))?
            }
        };

        if !status.is_success() {
            warn!(status = status.as_u16(), path = %req.path, "request failed");
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("unexpected response type: {e}")))?;

        // A 2xx response can still carry a server-signaled failure in the
        // envelope; surface it instead of handing back a hollow success.
        if envelope.status == "error" {
            return Err(Error::Http {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        Ok(envelope)
    }

    /// Strict single-entity fetch: a success envelope without `data` is a
    /// decode error.
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        req: Request,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let envelope: Envelope<T> = self.dispatch(req, cancel).await?;
        envelope
            .data
            .ok_or_else(|| Error::Decode("unexpected response type: missing data field".into()))
    }

    /// Lenient collection fetch: missing `data` is an empty vector, and the
    /// `meta` block is passed through as-is.
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        req: Request,
        cancel: &CancellationToken,
    ) -> Result<(Vec<T>, Option<PageMeta>)> {
        let envelope: Envelope<Vec<T>> = self.dispatch(req, cancel).await?;
        Ok((envelope.data.unwrap_or_default(), envelope.meta))
    }

    /// Serialize a payload, send it, and strictly extract the echoed entity.
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let body =
            serde_json::to_value(payload).map_err(|e| Error::Serialization(e.to_string()))?;
        self.fetch_one(Request::new(method, path).with_body(body), cancel)
            .await
    }

    /// Execute a request whose envelope carries no payload of interest.
    pub async fn execute(&self, req: Request, cancel: &CancellationToken) -> Result<()> {
        let _: Envelope<serde_json::Value> = self.dispatch(req, cancel).await?;
        Ok(())
    }
}

/// Pull the server's message out of an error body, falling back to the raw
/// text or the status line when the envelope does not decode.
fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    };
    match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(envelope) => envelope.message.unwrap_or_else(fallback),
        Err(_) if body.trim().is_empty() => fallback(),
        Err(_) => body.trim().to_string(),
    }
}
