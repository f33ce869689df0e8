//! Unpacking downloaded update archives.
//!
//! Extraction is synchronous and potentially slow; the engine runs it on a
//! blocking worker thread, so implementations of [`Extractor`] may freely
//! perform blocking I/O.

use crate::core::InstallerError;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Unpacks an archive file into a directory.
pub trait Extractor: Send + Sync {
    /// Extract `archive` into `destination`, creating it if necessary.
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}

/// Extracts `.zip` archives, keeping Unix permissions recorded in the archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl Extractor for ZipExtractor {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive)
            .with_context(|| format!("Failed to open archive: {}", archive.display()))?;

        let mut zip = zip::ZipArchive::new(file).map_err(|e| InstallerError::ExtractionFailed {
            archive: archive.display().to_string(),
            destination: destination.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!("Extracting {} entries into {}", zip.len(), destination.display());
        std::fs::create_dir_all(destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;

        zip.extract(destination).map_err(|e| InstallerError::ExtractionFailed {
            archive: archive.display().to_string(),
            destination: destination.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
