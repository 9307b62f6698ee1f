//! Common test utilities.
//!
//! Logging setup plus a catalog and clients shared by the integration tests.

#![allow(dead_code)]

pub mod fixtures;

/// Route `tracing` output through the test harness.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("marketkit=debug")
        .with_test_writer()
        .try_init();
}
