//! In-memory collaborators for engine tests.

use crate::core::InstallerError;
use crate::links::LinkProvisioner;
use crate::transport::Transport;
use crate::upgrade::EventSink;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Collects messages from both event streams.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    infos: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info_handler(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let infos = Arc::clone(&self.infos);
        move |message| infos.lock().unwrap().push(message.to_string())
    }

    pub fn error_handler(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let errors = Arc::clone(&self.errors);
        move |message| errors.lock().unwrap().push(message.to_string())
    }

    /// Register both handlers on `sink`.
    pub fn attach(&self, sink: &mut EventSink) {
        sink.on_info(self.info_handler());
        sink.on_error(self.error_handler());
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone)]
enum Response {
    Body(Vec<u8>),
    Failure(String),
}

/// Transport serving fixed responses keyed by URI.
///
/// Unknown URIs fail like an HTTP 404. Every request is recorded.
#[derive(Debug, Default)]
pub struct StaticTransport {
    responses: HashMap<String, Response>,
    requests: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(self, uri: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_bytes(uri, body.into().into_bytes())
    }

    #[must_use]
    pub fn with_bytes(mut self, uri: impl Into<String>, body: Vec<u8>) -> Self {
        self.responses.insert(uri.into(), Response::Body(body));
        self
    }

    #[must_use]
    pub fn with_failure(mut self, uri: impl Into<String>, reason: impl Into<String>) -> Self {
        self.responses.insert(uri.into(), Response::Failure(reason.into()));
        self
    }

    /// URIs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, uri: &str) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(uri.to_string());
        match self.responses.get(uri) {
            Some(Response::Body(body)) => Ok(body.clone()),
            Some(Response::Failure(reason)) => Err(InstallerError::NetworkError {
                operation: format!("GET {uri}"),
                reason: reason.clone(),
            }
            .into()),
            None => Err(InstallerError::NetworkError {
                operation: format!("GET {uri}"),
                reason: "HTTP 404 Not Found".to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn fetch_text(&self, uri: &str, _timeout: Option<Duration>) -> Result<String> {
        let body = self.respond(uri)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn download(
        &self,
        uri: &str,
        destination: &Path,
        _timeout: Option<Duration>,
    ) -> Result<()> {
        let body = self.respond(uri)?;
        tokio::fs::write(destination, body).await?;
        Ok(())
    }
}

/// Link provisioner that records requests instead of touching the disk and
/// fails for selected link paths.
#[derive(Debug, Default)]
pub struct FailingLinkProvisioner {
    failing: HashSet<PathBuf>,
    symlinks: Mutex<Vec<PathBuf>>,
    shortcuts: Mutex<Vec<PathBuf>>,
}

impl FailingLinkProvisioner {
    pub fn failing_on(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            failing: paths.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Symlinks created so far.
    pub fn symlinks(&self) -> Vec<PathBuf> {
        self.symlinks.lock().unwrap().clone()
    }

    /// Shortcuts created so far.
    pub fn shortcuts(&self) -> Vec<PathBuf> {
        self.shortcuts.lock().unwrap().clone()
    }

    fn record(&self, created: &Mutex<Vec<PathBuf>>, link: &Path) -> Result<()> {
        if self.failing.contains(link) {
            anyhow::bail!("Injected failure for {}", link.display());
        }
        created.lock().unwrap().push(link.to_path_buf());
        Ok(())
    }
}

impl LinkProvisioner for FailingLinkProvisioner {
    fn create_symlink(&self, _target: &Path, link: &Path) -> Result<()> {
        self.record(&self.symlinks, link)
    }

    fn create_shortcut(&self, _target: &Path, shortcut: &Path) -> Result<()> {
        self.record(&self.shortcuts, shortcut)
    }
}
