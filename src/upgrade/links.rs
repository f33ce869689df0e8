//! Link maintenance after an install.
//!
//! Every configured location is handled on its own: a failure is reported
//! on the error stream and the remaining links are still created.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::events::EventSink;
use crate::links::LinkProvisioner;
use crate::utils::{ensure_parent_dir, expand_user, is_windows, remove_existing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Shortcut,
    Symlink,
}

impl LinkKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Shortcut => "shortcut",
            Self::Symlink => "symlink",
        }
    }
}

/// Point every configured shortcut and symlink at `target`.
///
/// Shortcuts are only attempted on Windows. Returns the links that were
/// created, in configuration order.
pub fn refresh_links(
    provisioner: &dyn LinkProvisioner,
    target: &Path,
    shortcut_paths: &[String],
    symlink_paths: &[String],
    events: &EventSink,
) -> Vec<PathBuf> {
    let mut created = Vec::new();

    if is_windows() {
        create_all(LinkKind::Shortcut, provisioner, target, shortcut_paths, events, &mut created);
    }
    create_all(LinkKind::Symlink, provisioner, target, symlink_paths, events, &mut created);

    created
}

fn create_all(
    kind: LinkKind,
    provisioner: &dyn LinkProvisioner,
    target: &Path,
    paths: &[String],
    events: &EventSink,
    created: &mut Vec<PathBuf>,
) {
    for raw in paths {
        let link = expand_user(raw);
        match create_one(kind, provisioner, target, &link) {
            Ok(()) => {
                events.info(&format!("Created {} {}", kind.label(), link.display()));
                created.push(link);
            }
            Err(e) => {
                events.error(&format!("Failed to create {} {}: {e:#}", kind.label(), link.display()));
            }
        }
    }
}

fn create_one(
    kind: LinkKind,
    provisioner: &dyn LinkProvisioner,
    target: &Path,
    link: &Path,
) -> Result<()> {
    remove_existing(link)?;
    ensure_parent_dir(link)?;

    match kind {
        LinkKind::Shortcut => provisioner.create_shortcut(target, link),
        LinkKind::Symlink => provisioner.create_symlink(target, link),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::SystemLinkProvisioner;
    use crate::test_utils::{EventRecorder, FailingLinkProvisioner};
    use tempfile::TempDir;

    fn paths(temp: &TempDir, names: &[&str]) -> Vec<String> {
        names.iter().map(|name| temp.path().join(name).to_string_lossy().into_owned()).collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_replaces_existing_file_and_dangling_link() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        std::fs::write(&target, b"bin").unwrap();

        let occupied = temp.path().join("occupied");
        std::fs::write(&occupied, b"stale").unwrap();
        let dangling = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("gone"), &dangling).unwrap();

        let created = refresh_links(
            &SystemLinkProvisioner,
            &target,
            &[],
            &paths(&temp, &["occupied", "dangling", "nested/dir/link"]),
            &EventSink::new(),
        );

        assert_eq!(created.len(), 3);
        for link in created {
            assert_eq!(std::fs::read_link(&link).unwrap(), target);
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        let links = paths(&temp, &["one", "two", "three", "four"]);

        let provisioner = FailingLinkProvisioner::failing_on([PathBuf::from(&links[1])]);
        let recorder = EventRecorder::new();
        let mut events = EventSink::new();
        recorder.attach(&mut events);

        let created = refresh_links(&provisioner, &target, &[], &links, &events);

        let expected: Vec<PathBuf> =
            [&links[0], &links[2], &links[3]].into_iter().map(PathBuf::from).collect();
        assert_eq!(created, expected);
        assert_eq!(provisioner.symlinks(), expected);
        assert_eq!(recorder.errors().len(), 1);
        assert!(recorder.errors()[0].contains("two"));
        assert_eq!(recorder.infos().len(), 3);
        assert!(recorder.infos()[0].starts_with("Created symlink"));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_at_link_path_is_kept() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        std::fs::write(&target, b"bin").unwrap();

        let occupied = temp.path().join("bin");
        std::fs::create_dir_all(occupied.join("other-tools")).unwrap();
        std::fs::write(occupied.join("other-tools/important"), b"user data").unwrap();

        let recorder = EventRecorder::new();
        let mut events = EventSink::new();
        recorder.attach(&mut events);

        let links = paths(&temp, &["bin", "app-link"]);
        let created = refresh_links(&SystemLinkProvisioner, &target, &[], &links, &events);

        assert_eq!(created, vec![PathBuf::from(&links[1])]);
        assert_eq!(
            std::fs::read_to_string(occupied.join("other-tools/important")).unwrap(),
            "user data"
        );
        assert!(!std::fs::symlink_metadata(&occupied).unwrap().file_type().is_symlink());
        assert_eq!(recorder.errors().len(), 1);
        assert!(recorder.errors()[0].contains("Refusing to replace directory"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_shortcuts_skipped_off_windows() {
        let temp = TempDir::new().unwrap();
        let provisioner = FailingLinkProvisioner::default();
        let recorder = EventRecorder::new();
        let mut events = EventSink::new();
        recorder.attach(&mut events);

        let created = refresh_links(
            &provisioner,
            &temp.path().join("app"),
            &paths(&temp, &["app.lnk"]),
            &[],
            &events,
        );

        assert!(created.is_empty());
        assert!(provisioner.shortcuts().is_empty());
        assert!(recorder.errors().is_empty());
    }
}
