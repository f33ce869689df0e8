use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::backup::BackupManager;
use super::events::EventSink;
use super::first_run::FirstRunTracker;
use super::launch::spawn_detached;
use super::links::refresh_links;
use super::retention::prune_versions;
use crate::archive::{Extractor, ZipExtractor};
use crate::config::{InstallerConfig, ResolvedConfig, resolve};
use crate::core::InstallerError;
use crate::links::{LinkProvisioner, SystemLinkProvisioner};
use crate::transport::{HttpTransport, Transport};
use crate::utils::resolve_executable;
use crate::version::{Version, expand_version};

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: Version,
    /// Absolute path of the executable inside the new install folder.
    pub entry_point: PathBuf,
}

/// Drives the check, download, install and link workflow for one
/// application.
///
/// The engine owns the resolved configuration and the version state. Each
/// instance runs a single sequential flow; it performs no locking, and two
/// engines working on the same base path are not coordinated.
///
/// # Examples
///
/// ```rust,no_run
/// use just_installer::config::InstallerConfig;
/// use just_installer::upgrade::UpdateEngine;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = InstallerConfig::new(
///     "InstallMe",
///     "~/apps/install_me",
///     "version_{version}",
///     "https://example.com/InstallMe/version.txt",
///     "https://example.com/InstallMe/download/InstallMe_{version}.zip",
/// );
///
/// let mut engine = UpdateEngine::new(config)?;
/// engine.on_error(|message| eprintln!("{message}"));
///
/// if engine.check_for_update().await {
///     let installed = engine.install_update(true, &[]).await?;
///     println!("{installed:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct UpdateEngine {
    config: ResolvedConfig,
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn Extractor>,
    links: Arc<dyn LinkProvisioner>,
    events: EventSink,
    available_version: Option<Version>,
    first_run: FirstRunTracker,
}

impl UpdateEngine {
    /// Resolve `config` and create an engine with the default HTTP
    /// transport, zip extractor and OS link provisioner.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: InstallerConfig) -> Result<Self> {
        Self::with_collaborators(
            config,
            Arc::new(HttpTransport::new()?),
            Arc::new(ZipExtractor),
            Arc::new(SystemLinkProvisioner),
        )
    }

    /// Resolve `config` and create an engine using the given collaborators.
    pub fn with_collaborators(
        config: InstallerConfig,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn Extractor>,
        links: Arc<dyn LinkProvisioner>,
    ) -> Result<Self> {
        Ok(Self::from_resolved(resolve(config)?, transport, extractor, links))
    }

    /// Create an engine from an already resolved configuration.
    pub fn from_resolved(
        config: ResolvedConfig,
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn Extractor>,
        links: Arc<dyn LinkProvisioner>,
    ) -> Self {
        debug!("Resolved installer config: {:?}", config);

        let first_run = FirstRunTracker::new(config.settings_path.clone(), config.current_version);
        Self {
            config,
            transport,
            extractor,
            links,
            events: EventSink::new(),
            available_version: None,
            first_run,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Register a handler for progress messages.
    pub fn on_info(&mut self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.events.on_info(handler);
    }

    /// Register a handler for error messages.
    pub fn on_error(&mut self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.events.on_error(handler);
    }

    pub fn current_version(&self) -> Option<Version> {
        self.config.current_version
    }

    /// The version found by the last successful [`check_for_update`](Self::check_for_update).
    pub fn available_version(&self) -> Option<Version> {
        self.available_version
    }

    /// Whether the available version is newer than the running one.
    ///
    /// An unknown current version counts as older than anything.
    pub fn is_update_available(&self) -> bool {
        self.available_version
            .is_some_and(|available| self.config.current_version.is_none_or(|c| available > c))
    }

    /// Install folder for `version`.
    pub fn install_dir(&self, version: &Version) -> PathBuf {
        self.config
            .install_base_path
            .join(expand_version(&self.config.install_folder_template, version))
    }

    /// Fetch the version descriptor and record the published version.
    ///
    /// Returns `true` when the published version is newer than the running
    /// one. Fetch and parse failures are reported once on the error stream
    /// and yield `false`; the previously recorded version is kept in that
    /// case.
    pub async fn check_for_update(&mut self) -> bool {
        let uri = &self.config.current_version_uri;
        self.events.info(&format!("Checking for updates at {uri}"));

        let body = match self.transport.fetch_text(uri, self.config.http_timeout).await {
            Ok(body) => body,
            Err(e) => {
                self.events.error(&format!("Failed to fetch version descriptor from {uri}: {e:#}"));
                return false;
            }
        };

        let version = match Version::from_descriptor(&body) {
            Ok(version) => version,
            Err(e) => {
                self.events.error(&format!("Failed to parse version descriptor from {uri}: {e}"));
                return false;
            }
        };

        self.available_version = Some(version);
        let newer = self.is_update_available();
        if newer {
            self.events.info(&format!("Version {version} is available"));
        } else {
            self.events.info(&format!("Version {version} is not newer than the running version"));
        }
        newer
    }

    /// Download and install the available version next to the running one.
    ///
    /// The archive is fetched to a temporary file, an existing install
    /// folder for the same version is moved to its `_backup` sibling, and
    /// the archive is extracted into a fresh folder. Links are then
    /// refreshed, the new entry point is optionally launched with
    /// `run_args`, and old versions are pruned when retention is configured.
    ///
    /// Returns `Ok(None)` when the download failed; nothing on disk has
    /// changed in that case.
    ///
    /// # Errors
    ///
    /// - [`InstallerError::NoAvailableVersion`] when no check has succeeded yet
    /// - I/O errors while moving the old folder aside or extracting. There
    ///   is no automatic rollback; the previous content stays in the backup.
    pub async fn install_update(
        &self,
        run: bool,
        run_args: &[String],
    ) -> Result<Option<InstalledVersion>> {
        let version = self.available_version.ok_or(InstallerError::NoAvailableVersion)?;

        let uri = expand_version(&self.config.update_location_template, &version);
        let destination = self.install_dir(&version);

        let download = tempfile::Builder::new()
            .prefix("just-installer-")
            .suffix(".zip")
            .tempfile()
            .context("Failed to create temporary download file")?;

        self.events.info(&format!("Downloading version {version} from {uri}"));
        if let Err(e) = self.transport.download(&uri, download.path(), self.config.http_timeout).await
        {
            self.events.error(&format!("Failed to download {uri}: {e:#}"));
            return Ok(None);
        }

        let backup = BackupManager::new(destination.clone());
        if backup.swap_out().await? {
            self.events.info(&format!(
                "Moved existing install to {}",
                backup.backup_path().display()
            ));
        }

        self.events.info(&format!("Extracting into {}", destination.display()));
        let extractor = Arc::clone(&self.extractor);
        let archive = download.path().to_path_buf();
        let target = destination.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&archive, &target))
            .await
            .context("Extraction task failed")??;
        drop(download);

        let entry_point = resolve_executable(&destination.join(&self.config.entry_point));
        debug!("Entry point resolved to {}", entry_point.display());

        refresh_links(
            self.links.as_ref(),
            &entry_point,
            &self.config.windows_shortcut_paths,
            &self.config.symlink_paths,
            &self.events,
        );

        if run {
            match spawn_detached(&entry_point, run_args) {
                Ok(()) => self.events.info(&format!("Started {}", entry_point.display())),
                Err(e) => self.events.error(&format!("{e:#}")),
            }
        }

        if let Some(keep) = self.config.keep_version_count {
            let mut protected = vec![&version];
            if let Some(current) = &self.config.current_version {
                protected.push(current);
            }
            prune_versions(
                &self.config.install_base_path,
                &self.config.install_folder_template,
                keep,
                &protected,
                &self.events,
            )
            .await;
        }

        self.events.info(&format!("Installed version {version}"));
        Ok(Some(InstalledVersion {
            version,
            entry_point,
        }))
    }

    /// Check for an update when none is known yet and install it if it is
    /// newer than the running version.
    pub async fn install_update_if_available(
        &mut self,
        run: bool,
    ) -> Result<Option<InstalledVersion>> {
        if self.available_version.is_none() {
            self.check_for_update().await;
        }

        if !self.is_update_available() {
            debug!("No newer version to install");
            return Ok(None);
        }
        self.install_update(run, &[]).await
    }

    /// Whether this is the first run of the current version.
    ///
    /// The answer is computed once per engine. See [`FirstRunTracker`].
    pub async fn is_first_run_on_current_version(&self) -> Result<bool> {
        self.first_run.is_first_run(&self.events).await
    }

    /// Put the `_backup` folder of `version` back in place.
    ///
    /// Installs never do this on their own; it is a manual recovery step.
    pub async fn restore_backup(&self, version: &Version) -> Result<()> {
        let backup = BackupManager::new(self.install_dir(version));
        backup.restore_backup().await?;
        self.events.info(&format!("Restored version {version} from backup"));
        Ok(())
    }
}

impl std::fmt::Debug for UpdateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateEngine")
            .field("config", &self.config)
            .field("available_version", &self.available_version)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
