//! Async download engine.

use std::path::Path;

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use marketkit_core::{
    AsyncProgressCallback, AsyncSource, CancellationToken, MarketError, MarketResult, StoredFile,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::Limits;
use crate::config::EngineConfig;
use crate::progress::AsyncProgressDriver;
use crate::staging::{commit, stage};
use crate::target::{ResolvedTarget, resolve_target};

/// Streams an [`AsyncSource`] into a file under a caller-chosen root.
///
/// Every chunk read and file write is an await point. Cancellation is raced
/// against each pending chunk; stream items larger than the configured chunk
/// size are written and reported in chunk-size pieces.
#[derive(Debug, Clone, Default)]
pub struct AsyncDownloadEngine {
    config: EngineConfig,
}

impl AsyncDownloadEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Download `source` to `root/<sanitized candidate>`.
    ///
    /// Same protocol as [`DownloadEngine::download`](super::DownloadEngine::download).
    pub async fn download(
        &self,
        source: AsyncSource,
        root: &Path,
        candidate: &str,
        progress: Option<&mut dyn AsyncProgressCallback>,
        cancel: &CancellationToken,
    ) -> MarketResult<StoredFile> {
        let mut driver = AsyncProgressDriver::new(progress);
        let result = match resolve_target(root, candidate) {
            Ok(target) => self.transfer(source, &target, &mut driver, cancel).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(stored) => {
                info!(
                    target: "marketkit.download",
                    path = %stored.path.display(),
                    bytes = stored.bytes,
                    "Download complete"
                );
                driver.complete().await;
                Ok(stored)
            }
            Err(err) => {
                if err.is_cancelled() {
                    debug!(target: "marketkit.download", candidate, "Download cancelled");
                } else {
                    warn!(target: "marketkit.download", candidate, error = %err, "Download failed");
                }
                driver.error(&err).await;
                Err(err)
            }
        }
    }

    async fn transfer(
        &self,
        source: AsyncSource,
        target: &ResolvedTarget,
        driver: &mut AsyncProgressDriver<'_>,
        cancel: &CancellationToken,
    ) -> MarketResult<StoredFile> {
        let AsyncSource { mut stream, total } = source;
        let mut limits = Limits::new(total, self.config.max_file_size());
        limits.check_declared()?;

        driver.start(total).await;
        let (file, temp) = stage(target)?;
        let mut file = tokio::fs::File::from_std(file);
        debug!(
            target: "marketkit.download",
            file = %target.file_name,
            staging = %temp.display(),
            "Streaming to staging file"
        );

        let chunk_size = self.config.chunk_size();
        loop {
            let next = tokio::select! {
                biased;

                () = cancel.cancelled() => return Err(MarketError::Cancelled),

                next = self.next_chunk(&mut stream) => next?,
            };
            let Some(mut chunk) = next else {
                break;
            };

            while !chunk.is_empty() {
                if cancel.is_cancelled() {
                    return Err(MarketError::Cancelled);
                }
                let piece = chunk.split_to(chunk.len().min(chunk_size));
                let written = limits.accept(piece.len() as u64)?;
                file.write_all(&piece)
                    .await
                    .map_err(|e| MarketError::storage(&*temp, e.to_string()))?;
                driver.progress(written, total).await;
            }
        }
        limits.check_complete()?;

        file.flush()
            .await
            .map_err(|e| MarketError::storage(&*temp, e.to_string()))?;
        if self.config.sync_on_complete() {
            file.sync_all()
                .await
                .map_err(|e| MarketError::storage(&*temp, e.to_string()))?;
        }
        drop(file);
        commit(temp, target)?;

        Ok(StoredFile {
            path: target.path.clone(),
            bytes: limits.written(),
        })
    }

    /// Next item of the stream, bounded by the chunk timeout.
    async fn next_chunk(
        &self,
        stream: &mut BoxStream<'static, Result<Bytes, MarketError>>,
    ) -> MarketResult<Option<Bytes>> {
        let item = match self.config.chunk_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, stream.next())
                .await
                .map_err(|_| {
                    MarketError::network(format!("no data received for {}ms", timeout.as_millis()))
                })?,
            None => stream.next().await,
        };
        item.transpose()
    }
}
