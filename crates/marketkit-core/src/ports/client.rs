//! Marketplace client ports.
//!
//! A client owns exactly one auth provider and forwards `close()` to it.
//! Catalog lookups are platform code; downloads are usually composed with
//! `marketkit_download::deliver_asset`, which resolves the asset, opens its
//! source and streams it through the download engine.
//!
//! Download failures are returned as a failed [`DownloadOutcome`], never as
//! an `Err`.

use std::path::Path;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::auth::{AsyncAuthProvider, AuthProvider};
use super::progress::{AsyncProgressCallback, ProgressCallback};
use crate::domain::{AssetRecord, Collection, DownloadOutcome, Query};
use crate::error::MarketResult;

/// Blocking marketplace client.
///
/// Instances are not meant for concurrent use; run several clients for
/// parallelism.
pub trait MarketplaceClient {
    type Auth: AuthProvider;

    /// The provider this client owns.
    fn auth(&self) -> &Self::Auth;

    /// List assets. Query keys are platform-defined.
    fn get_collection(&mut self, query: &Query) -> MarketResult<Collection>;

    /// Fetch one asset. Fails with `NotFound` if it does not exist.
    fn get_asset(&mut self, uid: &str) -> MarketResult<AssetRecord>;

    /// Download an asset into `output_dir`.
    fn download_asset(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn ProgressCallback>,
        query: &Query,
    ) -> DownloadOutcome {
        self.download_asset_with(uid, output_dir, progress, query, &CancellationToken::new())
    }

    /// Download an asset, stopping at the next chunk boundary once `cancel`
    /// fires.
    fn download_asset_with(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn ProgressCallback>,
        query: &Query,
        cancel: &CancellationToken,
    ) -> DownloadOutcome;

    /// Release the client and its provider. Idempotent.
    fn close(&mut self) -> MarketResult<()>;
}

/// Async marketplace client. Same contract as [`MarketplaceClient`].
#[async_trait]
pub trait AsyncMarketplaceClient: Send {
    type Auth: AsyncAuthProvider;

    fn auth(&self) -> &Self::Auth;

    async fn get_collection(&mut self, query: &Query) -> MarketResult<Collection>;

    async fn get_asset(&mut self, uid: &str) -> MarketResult<AssetRecord>;

    async fn download_asset(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn AsyncProgressCallback>,
        query: &Query,
    ) -> DownloadOutcome {
        let cancel = CancellationToken::new();
        self.download_asset_with(uid, output_dir, progress, query, &cancel)
            .await
    }

    async fn download_asset_with(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn AsyncProgressCallback>,
        query: &Query,
        cancel: &CancellationToken,
    ) -> DownloadOutcome;

    async fn close(&mut self) -> MarketResult<()>;
}
