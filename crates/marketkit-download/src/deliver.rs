//! `download_asset` composition for platform clients.
//!
//! Resolve the asset, open its byte source, choose a filename and stream it
//! through the engine. Every failure becomes a failed [`DownloadOutcome`];
//! nothing is raised.

use std::path::Path;

use marketkit_core::utils::{format_bytes, sanitize_filename};
use marketkit_core::{
    AssetRecord, AsyncMarketplaceClient, AsyncProgressCallback, AsyncSourceProvider,
    CancellationToken, DownloadOutcome, MarketError, MarketResult, MarketplaceClient,
    ProgressCallback, Query, SourceProvider, StoredFile,
};
use tracing::warn;

use crate::engine::{AsyncDownloadEngine, DownloadEngine};

/// Download `uid` with a blocking client.
///
/// The filename is the source's suggestion if it has one, otherwise the
/// sanitized asset title, otherwise the uid. A missing source is reported
/// as `NotFound`; lookup failures keep their own kind.
pub fn deliver_asset<C>(
    client: &mut C,
    engine: &DownloadEngine,
    uid: &str,
    output_dir: &Path,
    progress: Option<&mut dyn ProgressCallback>,
    query: &Query,
    cancel: &CancellationToken,
) -> DownloadOutcome
where
    C: MarketplaceClient + SourceProvider,
{
    let resolved = client.get_asset(uid).and_then(|asset| {
        let source = client
            .open_source(&asset, query)?
            .ok_or_else(|| no_source(uid))?;
        let candidate = candidate_name(source.filename.as_deref(), &asset)?;
        Ok((source.source, candidate))
    });

    match resolved {
        Ok((source, candidate)) => {
            let streamed = engine.download(source, output_dir, &candidate, progress, cancel);
            finish(uid, streamed)
        }
        Err(err) => {
            if let Some(cb) = progress {
                cb.on_error(&err);
            }
            resolution_failed(uid, &err)
        }
    }
}

/// Download `uid` with an async client. See [`deliver_asset`].
pub async fn deliver_asset_async<C>(
    client: &mut C,
    engine: &AsyncDownloadEngine,
    uid: &str,
    output_dir: &Path,
    progress: Option<&mut dyn AsyncProgressCallback>,
    query: &Query,
    cancel: &CancellationToken,
) -> DownloadOutcome
where
    C: AsyncMarketplaceClient + AsyncSourceProvider,
{
    let resolved = async {
        let asset = client.get_asset(uid).await?;
        let source = client
            .open_source(&asset, query)
            .await?
            .ok_or_else(|| no_source(uid))?;
        let candidate = candidate_name(source.filename.as_deref(), &asset)?;
        Ok::<_, MarketError>((source.source, candidate))
    }
    .await;

    match resolved {
        Ok((source, candidate)) => {
            let streamed = engine
                .download(source, output_dir, &candidate, progress, cancel)
                .await;
            finish(uid, streamed)
        }
        Err(err) => {
            if let Some(cb) = progress {
                cb.on_error(&err).await;
            }
            resolution_failed(uid, &err)
        }
    }
}

fn no_source(uid: &str) -> MarketError {
    MarketError::not_found(format!("no download source available for asset '{uid}'"))
}

/// Pick the untrusted candidate filename.
///
/// A suggested filename is passed through unchanged so the engine can reject
/// traversal attempts. Titles are display text and are sanitized here.
fn candidate_name(suggested: Option<&str>, asset: &AssetRecord) -> MarketResult<String> {
    match suggested.filter(|name| !name.trim().is_empty()) {
        Some(name) => Ok(name.to_string()),
        None => sanitize_filename(asset.title()).or_else(|_| sanitize_filename(asset.uid())),
    }
}

fn finish(uid: &str, streamed: MarketResult<StoredFile>) -> DownloadOutcome {
    match streamed {
        Ok(stored) => DownloadOutcome::succeeded(uid, vec![stored.path])
            .with_metadata("bytes", stored.bytes)
            .with_metadata("size", format_bytes(stored.bytes)),
        Err(err) => DownloadOutcome::failed(uid, &err),
    }
}

fn resolution_failed(uid: &str, err: &MarketError) -> DownloadOutcome {
    warn!(target: "marketkit.download", uid = %uid, error = %err, "Cannot resolve download");
    DownloadOutcome::failed(uid, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_prefers_suggested_name() {
        let asset = AssetRecord::new("uid-1", "Fancy Rocks");
        assert_eq!(candidate_name(Some("rocks.zip"), &asset).unwrap(), "rocks.zip");
        assert_eq!(
            candidate_name(Some("../evil"), &asset).unwrap(),
            "../evil",
            "suggested names are validated by the engine, not rewritten"
        );
    }

    #[test]
    fn test_candidate_falls_back_to_title_then_uid() {
        let asset = AssetRecord::new("uid-1", "Rocks / Stones: Vol 2");
        assert_eq!(candidate_name(None, &asset).unwrap(), "Rocks  Stones Vol 2");
        assert_eq!(candidate_name(Some("  "), &asset).unwrap(), "Rocks  Stones Vol 2");

        let untitled = AssetRecord::new("uid-2", "???");
        assert_eq!(candidate_name(None, &untitled).unwrap(), "uid-2");

        let hopeless = AssetRecord::new("///", "***");
        assert!(candidate_name(None, &hopeless).is_err());
    }

    #[test]
    fn test_finish_records_size_metadata() {
        let outcome = finish(
            "a",
            Ok(StoredFile {
                path: "/tmp/a.bin".into(),
                bytes: 2048,
            }),
        );
        assert!(outcome.success());
        assert_eq!(outcome.metadata()["bytes"], 2048);
        assert_eq!(outcome.metadata()["size"], "2.00 KB");

        let outcome = finish("a", Err(MarketError::Cancelled));
        assert!(!outcome.success());
        assert_eq!(outcome.error_kind(), Some(marketkit_core::ErrorKind::Cancelled));
    }
}
