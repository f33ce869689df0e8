//! Fetching the version descriptor and update archives.
//!
//! The engine only needs two operations from the network, captured by the
//! [`Transport`] trait. [`HttpTransport`] is the default implementation built
//! on `reqwest`; it also serves `file://` URIs from the local filesystem,
//! which is handy for local release testing.

use crate::constants::{CONNECT_TIMEOUT, USER_AGENT};
use crate::core::InstallerError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Source of remote bytes for the update engine.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `uri` and return the body as text.
    async fn fetch_text(&self, uri: &str, timeout: Option<Duration>) -> Result<String>;

    /// Fetch `uri` and write the body to `destination`, replacing its content.
    async fn download(&self, uri: &str, destination: &Path, timeout: Option<Duration>)
    -> Result<()>;
}

/// `reqwest`-based transport with `file://` support.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the crate's user agent and connect timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
        })
    }

    /// Use a preconfigured client, e.g. one with a proxy.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
        }
    }

    async fn send(&self, uri: &str, timeout: Option<Duration>) -> Result<reqwest::Response> {
        let mut request = self.client.get(uri);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| InstallerError::NetworkError {
            operation: format!("GET {uri}"),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::NetworkError {
                operation: format!("GET {uri}"),
                reason: format!("HTTP {status}"),
            }
            .into());
        }
        Ok(response)
    }
}

/// Local path for a `file://` URI, `None` for any other scheme.
fn local_path(uri: &str) -> Option<PathBuf> {
    let url = Url::parse(uri).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_text(&self, uri: &str, timeout: Option<Duration>) -> Result<String> {
        if let Some(path) = local_path(uri) {
            debug!("Reading {} from local file", uri);
            return fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        debug!("Fetching {}", uri);
        let response = self.send(uri, timeout).await?;
        response.text().await.map_err(|e| {
            InstallerError::NetworkError {
                operation: format!("read body of {uri}"),
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn download(
        &self,
        uri: &str,
        destination: &Path,
        timeout: Option<Duration>,
    ) -> Result<()> {
        if let Some(path) = local_path(uri) {
            debug!("Copying {} to {}", path.display(), destination.display());
            fs::copy(&path, destination)
                .await
                .with_context(|| format!("Failed to copy {}", path.display()))?;
            return Ok(());
        }

        debug!("Downloading {} to {}", uri, destination.display());
        let mut response = self.send(uri, timeout).await?;
        let mut file = fs::File::create(destination)
            .await
            .with_context(|| format!("Failed to create {}", destination.display()))?;

        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| InstallerError::NetworkError {
            operation: format!("download {uri}"),
            reason: e.to_string(),
        })? {
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", destination.display()))?;
            written += chunk.len() as u64;
        }
        file.flush().await.context("Failed to flush download")?;

        debug!("Downloaded {} bytes from {}", written, uri);
        Ok(())
    }
}
