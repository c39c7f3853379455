//! Request dispatch to BetterTouchTool.
//!
//! Every call goes through [`Dispatcher::request`], which picks one of two
//! transports based on [`ConnectionConfig::use_cli`]:
//!
//! - [`HttpTransport`]: the BTT webserver (`http://host:port/<endpoint>/?...`)
//! - [`CliTransport`]: the `bttcli` executable (`bttcli <endpoint> key=value ...`)
//!
//! Transports never fail loudly. Whatever goes wrong is rendered as a string
//! starting with `Error:` so tools can hand it straight back to the caller.
//! An empty string is a successful reply with no output.

mod cli;
mod http;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::{ConnectionConfig, REQUEST_TIMEOUT_SECS};

pub use cli::CliTransport;
pub use http::{build_url, http_client, HttpTransport};

/// Prefix carried by every failed dispatch.
pub const ERROR_PREFIX: &str = "Error:";

/// Ordered request parameters. Entries whose value is `None` are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<String>)>,
}

impl Params {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((key.into(), Some(value.to_string())));
        self
    }

    /// Append a parameter that may be absent.
    pub fn set_opt<V: ToString>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.entries
            .push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// Append a boolean rendered as `"true"`/`"false"`.
    pub fn flag(self, key: impl Into<String>, value: bool) -> Self {
        self.set(key, if value { "true" } else { "false" })
    }

    /// Parameters that will actually be sent, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    /// Whether no parameter would be sent.
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Low-level transport failures, rendered with [`ERROR_PREFIX`] at the
/// dispatcher boundary.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The webserver rejected the shared secret.
    #[error("Authentication failed. Check your shared_secret configuration.")]
    Unauthorized,

    /// Non-success HTTP status.
    #[error("HTTP {status} - {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Could not reach the webserver.
    #[error("Could not connect to BTT webserver at {address}. Is the webserver enabled in BTT preferences?")]
    Connect {
        /// `host:port` that was tried.
        address: String,
    },

    /// The webserver did not answer in time.
    #[error("Request timed out. BTT may be busy or unresponsive.")]
    HttpTimeout,

    /// Any other HTTP client failure.
    #[error("Request failed - {0}")]
    Http(String),

    /// No `bttcli` in any known location.
    #[error("bttcli not found. Make sure BetterTouchTool is installed.")]
    CliMissing,

    /// The configured `bttcli` path does not exist.
    #[error("bttcli not found at {0}")]
    CliNotFound(String),

    /// `bttcli` exited unsuccessfully.
    #[error("bttcli failed - {0}")]
    CliFailed(String),

    /// `bttcli` did not finish in time.
    #[error("bttcli timed out")]
    CliTimeout,

    /// `bttcli` could not be spawned.
    #[error("bttcli could not be started - {0}")]
    CliSpawn(String),
}

impl TransportError {
    /// Render as a tool-facing error string.
    pub fn render(&self) -> String {
        format!("{} {}", ERROR_PREFIX, self)
    }
}

/// The transport selected for one request.
#[derive(Debug, Clone)]
pub enum Transport {
    /// BTT webserver.
    Http(HttpTransport),
    /// Local `bttcli` process.
    Cli(CliTransport),
}

impl Transport {
    /// Send a request, mapping failures to an `Error:` string.
    pub async fn send(&self, endpoint: &str, params: &Params) -> String {
        let result = match self {
            Transport::Http(http) => http.request(endpoint, params).await,
            Transport::Cli(cli) => cli.request(endpoint, params).await,
        };

        match result {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("BTT request `{}` failed: {}", endpoint, e);
                e.render()
            }
        }
    }
}

/// Builds a [`Transport`] per request from the connection configuration.
///
/// Webserver requests share one pooled HTTP client, so clones of a
/// dispatcher reuse connections to BTT.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    timeout: Duration,
    bttcli_path: Option<PathBuf>,
    http: Option<reqwest::Client>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            bttcli_path: None,
            http: http_client(),
        }
    }
}

impl Dispatcher {
    /// Create a dispatcher with the standard timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a specific `bttcli` executable instead of searching for one.
    pub fn with_bttcli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bttcli_path = Some(path.into());
        self
    }

    /// Pick the transport for this connection.
    pub fn transport(&self, config: &ConnectionConfig) -> Transport {
        if config.use_cli {
            Transport::Cli(CliTransport::new(self.bttcli_path.clone(), self.timeout))
        } else {
            Transport::Http(HttpTransport::new(
                self.http.clone(),
                config.clone(),
                self.timeout,
            ))
        }
    }

    /// Send `endpoint` with `params` to BTT.
    pub async fn request(&self, endpoint: &str, params: Params, config: &ConnectionConfig) -> String {
        tracing::debug!(
            endpoint,
            use_cli = config.use_cli,
            "dispatching BTT request"
        );
        self.transport(config).send(endpoint, &params).await
    }
}

/// Whether a dispatcher reply signals failure.
pub fn is_error(response: &str) -> bool {
    response.starts_with(ERROR_PREFIX)
}
