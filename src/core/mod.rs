//! Core types shared by every installer module.
//!
//! Currently this is the error layer: [`InstallerError`] for typed failures
//! and [`ErrorContext`] / [`user_friendly_error`] for presenting them to users.

pub mod error;

pub use error::{ErrorContext, InstallerError, user_friendly_error};
