//! Byte source ports.
//!
//! A platform turns an [`AssetRecord`] into a source of bytes (an HTTP body,
//! a local file, an in-memory buffer). The core only sees a reader or a
//! stream plus the declared length.

use std::fmt;
use std::io::Read;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use crate::domain::{AssetRecord, Query};
use crate::error::{MarketError, MarketResult};

/// Blocking byte source.
///
/// Readers that need to report a specific error category wrap a
/// [`MarketError`] in the `io::Error` (see [`MarketError::from_source_io`]).
pub struct BlockingSource {
    pub reader: Box<dyn Read + Send>,
    /// Declared length, if known.
    pub total: Option<u64>,
}

impl BlockingSource {
    pub fn new(reader: impl Read + Send + 'static, total: Option<u64>) -> Self {
        Self {
            reader: Box::new(reader),
            total,
        }
    }

    /// Source over an in-memory buffer with its exact length declared.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data: Bytes = data.into();
        let total = Some(data.len() as u64);
        Self::new(std::io::Cursor::new(data), total)
    }
}

impl fmt::Debug for BlockingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingSource")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// Async byte source: a stream of chunks.
pub struct AsyncSource {
    pub stream: BoxStream<'static, Result<Bytes, MarketError>>,
    /// Declared length, if known.
    pub total: Option<u64>,
}

impl AsyncSource {
    pub const fn new(
        stream: BoxStream<'static, Result<Bytes, MarketError>>,
        total: Option<u64>,
    ) -> Self {
        Self { stream, total }
    }

    /// Source yielding `chunks` in order, with their summed length declared.
    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        use futures_util::StreamExt;

        let total = chunks.iter().map(|c| c.len() as u64).sum();
        let stream = futures_util::stream::iter(chunks.into_iter().map(Ok)).boxed();
        Self::new(stream, Some(total))
    }
}

impl fmt::Debug for AsyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSource")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// A source plus the filename the platform suggests for it.
#[derive(Debug)]
pub struct ResolvedSource<S> {
    pub source: S,
    /// Untrusted suggested filename (e.g. from a `Content-Disposition`).
    pub filename: Option<String>,
}

impl<S> ResolvedSource<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            filename: None,
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Blocking lookup of an asset's byte source.
pub trait SourceProvider {
    /// Open the byte source for `asset`, or `None` if it has none.
    fn open_source(
        &mut self,
        asset: &AssetRecord,
        query: &Query,
    ) -> MarketResult<Option<ResolvedSource<BlockingSource>>>;
}

/// Async lookup of an asset's byte source.
#[async_trait]
pub trait AsyncSourceProvider: Send {
    async fn open_source(
        &mut self,
        asset: &AssetRecord,
        query: &Query,
    ) -> MarketResult<Option<ResolvedSource<AsyncSource>>>;
}
