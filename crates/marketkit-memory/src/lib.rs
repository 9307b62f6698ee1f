#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod auth;
mod catalog;
mod client;
mod config;

pub use auth::{AsyncStaticAuthProvider, StaticAuthProvider, TokenSession};
pub use catalog::Catalog;
pub use client::{AsyncMemoryClient, MemoryClient};
pub use config::StaticAuthConfig;

// Silence unused dev-dependency warnings; used by integration tests
#[cfg(test)]
use tracing_subscriber as _;
