//! Port definitions (trait abstractions) implemented by platforms.
//!
//! Ports use only domain types. Blocking and async variants have the same
//! shape and are independent traits; neither is derived from the other.
//!
//! # Design Rules
//!
//! - No HTTP client types in any signature
//! - Session capabilities are associated types, never inspected by the core
//! - Download failures are values (`DownloadOutcome`), lookups return `Result`

mod auth;
mod client;
mod progress;
mod source;

pub use auth::{AsyncAuthProvider, AuthProvider};
pub use client::{AsyncMarketplaceClient, MarketplaceClient};
pub use progress::{AsyncProgressCallback, NoopProgress, ProgressCallback, ProgressRecorder};
pub use source::{
    AsyncSource, AsyncSourceProvider, BlockingSource, ResolvedSource, SourceProvider,
};
