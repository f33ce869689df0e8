use anyhow::Result;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::OnceCell;
use tracing::debug;

use super::events::EventSink;
use crate::constants::FIRST_RUN_MARKER_FILE;
use crate::core::InstallerError;
use crate::utils::atomic_write;
use crate::version::Version;

/// Detects the first execution of the running version.
///
/// The last version that ran is recorded in a marker file under the settings
/// directory. The marker is consulted once; the answer is then kept for the
/// lifetime of the tracker so repeated queries within one process agree.
///
/// Marker I/O problems are reported on the error stream and treated as "no
/// marker", so a broken settings directory results in a first run rather
/// than a failure.
#[derive(Debug)]
pub struct FirstRunTracker {
    settings_path: PathBuf,
    current_version: Option<Version>,
    answer: OnceCell<bool>,
}

impl FirstRunTracker {
    pub fn new(settings_path: PathBuf, current_version: Option<Version>) -> Self {
        Self {
            settings_path,
            current_version,
            answer: OnceCell::new(),
        }
    }

    pub fn marker_path(&self) -> PathBuf {
        self.settings_path.join(FIRST_RUN_MARKER_FILE)
    }

    /// Whether the running version differs from the one recorded last time.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::SettingsPathUnset`] when no settings path is
    /// configured. Errors are not cached, the next call tries again.
    pub async fn is_first_run(&self, events: &EventSink) -> Result<bool> {
        self.answer.get_or_try_init(|| self.evaluate(events)).await.copied()
    }

    async fn evaluate(&self, events: &EventSink) -> Result<bool> {
        if self.settings_path.as_os_str().is_empty() {
            return Err(InstallerError::SettingsPathUnset.into());
        }

        if let Err(e) = fs::create_dir_all(&self.settings_path).await {
            events.error(&format!(
                "Failed to create settings directory {}: {e}",
                self.settings_path.display()
            ));
        }

        let recorded = self.read_marker(events).await;
        let Some(current) = &self.current_version else {
            debug!("No current version known, treating as first run");
            return Ok(true);
        };

        if recorded.as_ref() == Some(current) {
            debug!("Marker matches current version {current}");
            return Ok(false);
        }

        let marker = self.marker_path();
        if let Err(e) = atomic_write(&marker, current.to_string().as_bytes()) {
            events.error(&format!("Failed to record version {current} in marker: {e:#}"));
        } else {
            events.info(&format!("First run of version {current}"));
        }
        Ok(true)
    }

    async fn read_marker(&self, events: &EventSink) -> Option<Version> {
        let marker = self.marker_path();
        let content = match fs::read_to_string(&marker).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                events.error(&format!("Failed to read marker {}: {e}", marker.display()));
                return None;
            }
        };

        match Version::from_descriptor(&content) {
            Ok(version) => Some(version),
            Err(e) => {
                events.error(&format!("Ignoring marker {}: {e}", marker.display()));
                None
            }
        }
    }
}
