//! Test utilities for just-installer
//!
//! This module provides in-memory collaborators for the update engine and
//! fixture builders, so engine behavior can be tested without a network or
//! real links.
//!
//! # Example
//!
//! ```rust,no_run
//! use just_installer::test_utils::{EventRecorder, StaticTransport, zip_archive};
//!
//! let transport = StaticTransport::new()
//!     .with_text("mem://version.txt", "1.2.0\n")
//!     .with_bytes("mem://app_1.2.0.zip", zip_archive(&[("app", "#!/bin/sh\n")]));
//!
//! let recorder = EventRecorder::new();
//! // engine.on_error(recorder.error_handler());
//! ```

pub mod fakes;
pub mod fixtures;

pub use fakes::{EventRecorder, FailingLinkProvisioner, StaticTransport};
pub use fixtures::{config_for, zip_archive};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
