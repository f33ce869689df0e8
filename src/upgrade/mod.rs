//! The update engine.
//!
//! [`UpdateEngine`] detects whether a newer version of the host application
//! is published, installs it side by side with the running version and keeps
//! the user's shortcuts and symlinks pointing at the newest install.
//!
//! # Update Process Flow
//!
//! ```text
//! 1. Version Check
//!    ├── Fetch the version descriptor
//!    └── Parse its leading token and compare with the running version
//!
//! 2. Download
//!    └── Fetch the archive for the available version to a temporary file
//!
//! 3. Install
//!    ├── Move an existing folder for that version to <folder>_backup
//!    └── Extract the archive into a fresh folder
//!
//! 4. Post-Install
//!    ├── Recreate shortcuts (Windows) and symlinks
//!    ├── Optionally launch the new entry point, detached
//!    └── Prune old versions when retention is configured
//! ```
//!
//! # Install Layout
//!
//! ```text
//! <install_base_path>/
//! ├── version_1.1/            # running version, never touched
//! ├── version_1.2/            # freshly extracted
//! ├── version_1.2_backup/     # previous content of version_1.2, if any
//! └── settings/
//!     └── current_version.txt # first-run marker
//! ```
//!
//! # Error Handling
//!
//! Configuration errors stop engine construction. Failed checks and
//! downloads are reported through [`UpdateEngine::on_error`] handlers and
//! yield a negative result. Failures while moving the old folder aside or
//! extracting are returned to the caller. Links, launching, pruning and
//! marker I/O are best effort: each failure is reported and the workflow
//! continues.
//!
//! # Events
//!
//! Handlers registered with [`UpdateEngine::on_info`] and
//! [`UpdateEngine::on_error`] are called synchronously, in registration
//! order, when an event happens. Events emitted before a handler is
//! registered are not replayed.

pub mod backup;
mod engine;
pub mod events;
pub mod first_run;
pub mod launch;
pub mod links;
pub mod retention;


pub use engine::{InstalledVersion, UpdateEngine};
pub use events::{EventHandler, EventSink};
pub use first_run::FirstRunTracker;
