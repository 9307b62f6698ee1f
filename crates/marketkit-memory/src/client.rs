//! Catalog-backed marketplace clients.

use std::path::Path;

use async_trait::async_trait;
use marketkit_core::{
    AssetRecord, AsyncAuthProvider, AsyncMarketplaceClient, AsyncProgressCallback, AsyncSource,
    AsyncSourceProvider, AuthProvider, BlockingSource, CancellationToken, Collection,
    DownloadOutcome, MarketResult, MarketplaceClient, ProgressCallback, Query, ResolvedSource,
    SourceProvider,
};
use marketkit_download::{
    AsyncDownloadEngine, DownloadEngine, EngineConfig, deliver_asset, deliver_asset_async,
};
use tracing::debug;

use crate::auth::{AsyncStaticAuthProvider, StaticAuthProvider};
use crate::catalog::Catalog;

/// Blocking client over a [`Catalog`].
///
/// Every catalog call requires a live session, so a closed client fails
/// with `ResourceClosed`.
#[derive(Debug)]
pub struct MemoryClient {
    auth: StaticAuthProvider,
    catalog: Catalog,
    engine: DownloadEngine,
}

impl MemoryClient {
    pub fn new(auth: StaticAuthProvider, catalog: Catalog) -> Self {
        Self {
            auth,
            catalog,
            engine: DownloadEngine::default(),
        }
    }

    #[must_use]
    pub fn with_engine(mut self, config: EngineConfig) -> Self {
        self.engine = DownloadEngine::new(config);
        self
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl MarketplaceClient for MemoryClient {
    type Auth = StaticAuthProvider;

    fn auth(&self) -> &StaticAuthProvider {
        &self.auth
    }

    fn get_collection(&mut self, query: &Query) -> MarketResult<Collection> {
        self.auth.get_session()?;
        let collection = self.catalog.query(query)?;
        debug!(target: "marketkit.memory", returned = collection.len(), "Collection query");
        Ok(collection)
    }

    fn get_asset(&mut self, uid: &str) -> MarketResult<AssetRecord> {
        self.auth.get_session()?;
        self.catalog.asset(uid)
    }

    fn download_asset_with(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn ProgressCallback>,
        query: &Query,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        let engine = self.engine.clone();
        deliver_asset(self, &engine, uid, output_dir, progress, query, cancel)
    }

    fn close(&mut self) -> MarketResult<()> {
        self.auth.close()
    }
}

impl SourceProvider for MemoryClient {
    fn open_source(
        &mut self,
        asset: &AssetRecord,
        _query: &Query,
    ) -> MarketResult<Option<ResolvedSource<BlockingSource>>> {
        self.auth.get_session()?;
        self.catalog.blocking_source(asset.uid())
    }
}

/// Async client over a [`Catalog`]. Same behavior as [`MemoryClient`].
#[derive(Debug)]
pub struct AsyncMemoryClient {
    auth: AsyncStaticAuthProvider,
    catalog: Catalog,
    engine: AsyncDownloadEngine,
}

impl AsyncMemoryClient {
    pub fn new(auth: AsyncStaticAuthProvider, catalog: Catalog) -> Self {
        Self {
            auth,
            catalog,
            engine: AsyncDownloadEngine::default(),
        }
    }

    #[must_use]
    pub fn with_engine(mut self, config: EngineConfig) -> Self {
        self.engine = AsyncDownloadEngine::new(config);
        self
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl AsyncMarketplaceClient for AsyncMemoryClient {
    type Auth = AsyncStaticAuthProvider;

    fn auth(&self) -> &AsyncStaticAuthProvider {
        &self.auth
    }

    async fn get_collection(&mut self, query: &Query) -> MarketResult<Collection> {
        self.auth.get_session().await?;
        let collection = self.catalog.query(query)?;
        debug!(target: "marketkit.memory", returned = collection.len(), "Collection query");
        Ok(collection)
    }

    async fn get_asset(&mut self, uid: &str) -> MarketResult<AssetRecord> {
        self.auth.get_session().await?;
        self.catalog.asset(uid)
    }

    async fn download_asset_with(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn AsyncProgressCallback>,
        query: &Query,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        let engine = self.engine.clone();
        deliver_asset_async(self, &engine, uid, output_dir, progress, query, cancel).await
    }

    async fn close(&mut self) -> MarketResult<()> {
        self.auth.close().await
    }
}

#[async_trait]
impl AsyncSourceProvider for AsyncMemoryClient {
    async fn open_source(
        &mut self,
        asset: &AssetRecord,
        _query: &Query,
    ) -> MarketResult<Option<ResolvedSource<AsyncSource>>> {
        self.auth.get_session().await?;
        self.catalog.async_source(asset.uid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticAuthConfig;
    use marketkit_core::{ErrorKind, MarketError};

    fn catalog() -> Catalog {
        Catalog::new()
            .with_asset(AssetRecord::new("a", "Alpha"))
            .unwrap()
            .with_payload("a", &b"alpha bytes"[..], None)
            .unwrap()
    }

    fn client() -> MemoryClient {
        let auth = StaticAuthProvider::new(StaticAuthConfig::new("https://m.example", "t")).unwrap();
        MemoryClient::new(auth, catalog())
    }

    #[test]
    fn test_lookup_opens_session() {
        let mut client = client();
        assert_eq!(client.auth().sessions_issued(), 0);
        assert_eq!(client.get_asset("a").unwrap().title(), "Alpha");
        assert_eq!(client.auth().sessions_issued(), 1);
        assert!(matches!(
            client.get_asset("zzz"),
            Err(MarketError::NotFound { .. })
        ));
    }

    #[test]
    fn test_closed_client_rejects_calls() {
        let mut client = client();
        client.close().unwrap();
        client.close().unwrap();
        let err = client.get_collection(&Query::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceClosed);
    }

    #[test]
    fn test_download_uses_title_as_filename() {
        let tmp = tempfile::tempdir().unwrap();
        let mut client = client();
        let outcome = client.download_asset("a", tmp.path(), None, &Query::new());
        assert!(outcome.success(), "{:?}", outcome.error());
        assert_eq!(outcome.files(), [tmp.path().canonicalize().unwrap().join("Alpha")]);
    }

    #[tokio::test]
    async fn test_async_closed_client_fails_download() {
        let tmp = tempfile::tempdir().unwrap();
        let auth =
            AsyncStaticAuthProvider::new(StaticAuthConfig::new("https://m.example", "t")).unwrap();
        let mut client = AsyncMemoryClient::new(auth, catalog());
        client.close().await.unwrap();

        let outcome = client
            .download_asset("a", tmp.path(), None, &Query::new())
            .await;
        assert!(!outcome.success());
        assert_eq!(outcome.error_kind(), Some(ErrorKind::ResourceClosed));
    }
}
