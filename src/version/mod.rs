//! Application version numbers and version templates.
//!
//! Published versions use the `major[.minor[.revision]]` form, for example
//! `3.2.1` or `1.4`. A bare unsigned integer such as `7` is accepted and read
//! as `7.0`. The version descriptor served by the update server only has to
//! start with such a token; anything after the first whitespace (a commit hash,
//! release notes) is ignored.
//!
//! # Ordering
//!
//! Versions compare numerically component by component. A version without a
//! revision sorts before the same version with any revision, so `1.2 < 1.2.0`.
//! There are no pre-release or build-metadata semantics.
//!
//! # Module Organization
//!
//! - [`Version`] - the parsed version value
//! - [`template`] - `{version}` substitution and matching in folder/URI templates

pub mod template;

use crate::core::InstallerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use template::{expand_version, match_version};

/// A `major.minor[.revision]` application version.
///
/// ```rust,no_run
/// use just_installer::version::Version;
///
/// let v: Version = "3.2.1".parse().unwrap();
/// assert!(v > "3.2".parse().unwrap());
/// assert_eq!("7".parse::<Version>().unwrap().to_string(), "7.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u32,
    minor: u32,
    revision: Option<u32>,
}

impl Version {
    /// Create a two-component version.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            revision: None,
        }
    }

    /// Create a three-component version.
    #[must_use]
    pub const fn with_revision(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision: Some(revision),
        }
    }

    pub const fn major(&self) -> u32 {
        self.major
    }

    pub const fn minor(&self) -> u32 {
        self.minor
    }

    pub const fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// Parse the version out of a version descriptor body.
    ///
    /// Only the first whitespace-delimited token is considered, so
    /// `"3.2.1 abcdef\n"` yields `3.2.1`.
    pub fn from_descriptor(body: &str) -> Result<Self, InstallerError> {
        let token = body.split_whitespace().next().ok_or_else(|| InstallerError::InvalidVersion {
            input: body.to_string(),
        })?;
        token.parse()
    }

    /// Convert a semantic version, dropping pre-release and build metadata.
    ///
    /// Returns `None` when a component does not fit in 32 bits.
    #[must_use]
    pub fn from_semver(version: &semver::Version) -> Option<Self> {
        Some(Self {
            major: u32::try_from(version.major).ok()?,
            minor: u32::try_from(version.minor).ok()?,
            revision: Some(u32::try_from(version.patch).ok()?),
        })
    }

    /// The version of the running build, taken from `CARGO_PKG_VERSION`.
    #[must_use]
    pub fn build_version() -> Option<Self> {
        semver::Version::parse(env!("CARGO_PKG_VERSION")).ok().as_ref().and_then(Self::from_semver)
    }
}

fn parse_component(part: &str, input: &str) -> Result<u32, InstallerError> {
    // u32::from_str would accept a leading '+'
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InstallerError::InvalidVersion {
            input: input.to_string(),
        });
    }
    part.parse().map_err(|_| InstallerError::InvalidVersion {
        input: input.to_string(),
    })
}

impl FromStr for Version {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [major] => Ok(Self::new(parse_component(major, s)?, 0)),
            [major, minor] => Ok(Self::new(parse_component(major, s)?, parse_component(minor, s)?)),
            [major, minor, revision] => Ok(Self::with_revision(
                parse_component(major, s)?,
                parse_component(minor, s)?,
                parse_component(revision, s)?,
            )),
            _ => Err(InstallerError::InvalidVersion {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(revision) = self.revision {
            write!(f, ".{revision}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Version {
    type Error = InstallerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}
