//! BTT webserver transport.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{Params, TransportError};
use crate::config::ConnectionConfig;

/// Everything except RFC 3986 unreserved characters is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build the pooled client shared by every webserver request.
///
/// `None` when the TLS backend cannot be initialised; requests then fail with
/// an `Error:` reply instead of panicking.
pub fn http_client() -> Option<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .map_err(|e| tracing::error!("HTTP client unavailable: {}", e))
        .ok()
}

/// Sends requests to the BTT webserver.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Option<reqwest::Client>,
    config: ConnectionConfig,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for one connection over a shared client.
    pub fn new(client: Option<reqwest::Client>, config: ConnectionConfig, timeout: Duration) -> Self {
        Self {
            client,
            config,
            timeout,
        }
    }

    /// GET `endpoint` and return the body text.
    pub async fn request(&self, endpoint: &str, params: &Params) -> Result<String, TransportError> {
        let url = build_url(endpoint, params, &self.config);
        tracing::debug!("GET {}", redact(&url, self.config.shared_secret.as_deref()));

        let client = self
            .client
            .as_ref()
            .ok_or_else(|| TransportError::Http("HTTP client could not be initialised".into()))?;

        let response = client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized);
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::HttpTimeout
        } else if err.is_connect() {
            TransportError::Connect {
                address: self.config.address(),
            }
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

/// Build the webserver URL for `endpoint`.
///
/// Absent parameters are dropped; the shared secret, when configured, is
/// appended last. Keys and values are percent-encoded (RFC 3986 unreserved
/// characters pass through, space becomes `%20`).
pub fn build_url(endpoint: &str, params: &Params, config: &ConnectionConfig) -> String {
    let base = format!("http://{}:{}/{}/", config.host, config.port, endpoint);

    let mut pairs: Vec<(&str, &str)> = params.present().collect();
    if let Some(secret) = config.shared_secret.as_deref() {
        pairs.retain(|(k, _)| *k != "shared_secret");
        pairs.push(("shared_secret", secret));
    }

    if pairs.is_empty() {
        return base;
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

fn redact(url: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => url.replace(&encode(secret), "***"),
        _ => url.to_string(),
    }
}
