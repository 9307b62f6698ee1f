#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

mod config;
mod deliver;
mod engine;
pub mod progress;
mod staging;
mod target;

pub use config::{DEFAULT_CHUNK_SIZE, EngineConfig, MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
pub use deliver::{deliver_asset, deliver_asset_async};
pub use engine::{AsyncDownloadEngine, DownloadEngine};
pub use progress::{ProgressThrottle, TracingProgress};
pub use target::{ResolvedTarget, resolve_target};

// Silence unused dev-dependency warnings; used by integration tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tokio_test as _;
