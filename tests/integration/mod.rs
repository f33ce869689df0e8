//! Integration test suite for just-installer
//!
//! End-to-end tests of the update engine against a real HTTP server and of
//! the `just-installer` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **engine_flow**: Check and install against a `wiremock` server
//! - **cli**: The binary driven through `file://` URIs

mod cli;
mod engine_flow;
