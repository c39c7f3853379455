//! `bttcli` transport.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use super::{Params, TransportError};
use crate::config::find_bttcli;

/// Runs `bttcli <endpoint> key=value ...`.
#[derive(Debug, Clone)]
pub struct CliTransport {
    path: Option<PathBuf>,
    timeout: Duration,
}

impl CliTransport {
    /// Create a transport. `path` overrides the install-location search.
    pub fn new(path: Option<PathBuf>, timeout: Duration) -> Self {
        Self { path, timeout }
    }

    /// Command-line arguments for a request.
    pub fn args(endpoint: &str, params: &Params) -> Vec<String> {
        std::iter::once(endpoint.to_string())
            .chain(params.present().map(|(k, v)| format!("{}={}", k, v)))
            .collect()
    }

    /// Run the request and return stdout.
    pub async fn request(&self, endpoint: &str, params: &Params) -> Result<String, TransportError> {
        let path = find_bttcli(self.path.as_deref()).ok_or(TransportError::CliMissing)?;
        let args = Self::args(endpoint, params);
        tracing::debug!("exec {} {}", path.display(), endpoint);

        let child = Command::new(&path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    TransportError::CliNotFound(path.display().to_string())
                }
                _ => TransportError::CliSpawn(e.to_string()),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| TransportError::CliTimeout)?
            .map_err(|e| TransportError::CliSpawn(e.to_string()))?;

        if !output.status.success() {
            return Err(TransportError::CliFailed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
