//! Fixture builders for installer tests.

use crate::config::InstallerConfig;
use crate::version::Version;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Build an in-memory zip archive from `(name, content)` pairs.
///
/// Entries are marked executable so an archived script can be launched
/// straight after extraction.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().unix_permissions(0o755);

    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Configuration for an app named `app` installed under `base`.
///
/// Descriptor and archives are served from `base_uri`:
/// `<base_uri>/version.txt` and `<base_uri>/app_{version}.zip`.
pub fn config_for(base: &Path, base_uri: &str, current: Version) -> InstallerConfig {
    InstallerConfig::new(
        "app",
        base.to_string_lossy(),
        "app_{version}",
        format!("{base_uri}/version.txt"),
        format!("{base_uri}/app_{{version}}.zip"),
    )
    .with_current_version(current)
}
