//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory creation, atomic writes and link-safe removal
//! - [`platform`] - Home-directory expansion and executable resolution

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir, ensure_parent_dir, remove_existing, remove_tree};
pub use platform::{expand_user, get_home_dir, is_windows, resolve_executable};
