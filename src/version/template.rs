//! `{version}` templates for install folders and download URIs.

use super::Version;
use crate::constants::VERSION_TOKEN;

/// Substitute every `{version}` placeholder in `template`.
///
/// ```rust,no_run
/// use just_installer::version::{Version, expand_version};
///
/// let url = expand_version("https://example.com/app_{version}.zip", &Version::new(1, 2));
/// assert_eq!(url, "https://example.com/app_1.2.zip");
/// ```
#[must_use]
pub fn expand_version(template: &str, version: &Version) -> String {
    template.replace(VERSION_TOKEN, &version.to_string())
}

/// Recover the version from a name produced by [`expand_version`].
///
/// Returns `None` when `name` was not generated from `template`, for example
/// the `_backup` sibling of an install folder.
#[must_use]
pub fn match_version(template: &str, name: &str) -> Option<Version> {
    let token_at = template.find(VERSION_TOKEN)?;
    let rest = name.strip_prefix(&template[..token_at])?;

    let run_len = rest.bytes().take_while(|b| b.is_ascii_digit() || *b == b'.').count();

    // The version may be followed by a literal '.', so try the longest candidate first
    (1..=run_len).rev().find_map(|end| {
        let version: Version = rest[..end].parse().ok()?;
        (expand_version(template, &version) == name).then_some(version)
    })
}
