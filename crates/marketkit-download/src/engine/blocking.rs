//! Blocking download engine.

use std::io::{ErrorKind as IoErrorKind, Read, Write};
use std::path::Path;

use marketkit_core::{
    BlockingSource, CancellationToken, MarketError, MarketResult, ProgressCallback, StoredFile,
};
use tracing::{debug, info, warn};

use super::Limits;
use crate::config::EngineConfig;
use crate::progress::ProgressDriver;
use crate::staging::{commit, stage};
use crate::target::{ResolvedTarget, resolve_target};

/// Streams a [`BlockingSource`] into a file under a caller-chosen root.
#[derive(Debug, Clone, Default)]
pub struct DownloadEngine {
    config: EngineConfig,
}

impl DownloadEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Download `source` to `root/<sanitized candidate>`.
    ///
    /// Reports `Start` once before any write, `Progress` after every
    /// non-empty chunk, then exactly one of `Complete` (after the final
    /// rename) or `Error`. Cancellation is checked before each read.
    pub fn download(
        &self,
        source: BlockingSource,
        root: &Path,
        candidate: &str,
        progress: Option<&mut dyn ProgressCallback>,
        cancel: &CancellationToken,
    ) -> MarketResult<StoredFile> {
        let mut driver = ProgressDriver::new(progress);
        let result = resolve_target(root, candidate)
            .and_then(|target| self.transfer(source, &target, &mut driver, cancel));

        match result {
            Ok(stored) => {
                info!(
                    target: "marketkit.download",
                    path = %stored.path.display(),
                    bytes = stored.bytes,
                    "Download complete"
                );
                driver.complete();
                Ok(stored)
            }
            Err(err) => {
                if err.is_cancelled() {
                    debug!(target: "marketkit.download", candidate, "Download cancelled");
                } else {
                    warn!(target: "marketkit.download", candidate, error = %err, "Download failed");
                }
                driver.error(&err);
                Err(err)
            }
        }
    }

    fn transfer(
        &self,
        source: BlockingSource,
        target: &ResolvedTarget,
        driver: &mut ProgressDriver<'_>,
        cancel: &CancellationToken,
    ) -> MarketResult<StoredFile> {
        let BlockingSource { mut reader, total } = source;
        let mut limits = Limits::new(total, self.config.max_file_size());
        limits.check_declared()?;

        driver.start(total);
        let (mut file, temp) = stage(target)?;
        debug!(
            target: "marketkit.download",
            file = %target.file_name,
            staging = %temp.display(),
            "Streaming to staging file"
        );

        let mut buf = vec![0_u8; self.config.chunk_size()];
        loop {
            if cancel.is_cancelled() {
                return Err(MarketError::Cancelled);
            }
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
                Err(e) => return Err(MarketError::from_source_io(&e)),
            };

            let written = limits.accept(n as u64)?;
            file.write_all(&buf[..n])
                .map_err(|e| MarketError::storage(&*temp, e.to_string()))?;
            driver.progress(written, total);
        }
        limits.check_complete()?;

        file.flush()
            .map_err(|e| MarketError::storage(&*temp, e.to_string()))?;
        if self.config.sync_on_complete() {
            file.sync_all()
                .map_err(|e| MarketError::storage(&*temp, e.to_string()))?;
        }
        drop(file);
        commit(temp, target)?;

        Ok(StoredFile {
            path: target.path.clone(),
            bytes: limits.written(),
        })
    }
}
