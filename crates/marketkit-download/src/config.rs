//! Download engine configuration.

use std::time::Duration;

/// Smallest accepted chunk size.
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;
/// Largest accepted chunk size.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;
/// Default chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration shared by the blocking and async engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    chunk_size: usize,
    sync_on_complete: bool,
    max_file_size: Option<u64>,
    chunk_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sync_on_complete: true,
            max_file_size: None,
            chunk_timeout: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read/write unit, clamped to `MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE`.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE);
        self
    }

    /// Whether to fsync the staged file before the final rename.
    #[must_use]
    pub const fn with_sync_on_complete(mut self, sync: bool) -> Self {
        self.sync_on_complete = sync;
        self
    }

    /// Refuse sources that declare or deliver more than `limit` bytes.
    #[must_use]
    pub const fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = Some(limit);
        self
    }

    /// Fail an async download when no chunk arrives within `timeout`.
    /// Ignored by the blocking engine.
    #[must_use]
    pub const fn with_chunk_timeout(mut self, timeout: Duration) -> Self {
        self.chunk_timeout = Some(timeout);
        self
    }

    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub const fn sync_on_complete(&self) -> bool {
        self.sync_on_complete
    }

    pub const fn max_file_size(&self) -> Option<u64> {
        self.max_file_size
    }

    pub const fn chunk_timeout(&self) -> Option<Duration> {
        self.chunk_timeout
    }
}
