#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod events;
pub mod ports;
pub mod scope;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use domain::{AssetRecord, Collection, DownloadOutcome, EndpointConfig, Query, StoredFile};
pub use error::{ErrorKind, MarketError, MarketResult};
pub use events::ProgressEvent;
pub use ports::{
    AsyncAuthProvider, AsyncMarketplaceClient, AsyncProgressCallback, AsyncSource,
    AsyncSourceProvider, AuthProvider, BlockingSource, MarketplaceClient, NoopProgress,
    ProgressCallback, ProgressRecorder, ResolvedSource, SourceProvider,
};
pub use scope::{with_client, with_client_async};
pub use session::{SessionSlot, SessionState};

// Re-exported so platforms name the same token type as the core
pub use tokio_util::sync::CancellationToken;
