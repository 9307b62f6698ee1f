//! Catalog and client fixtures.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use marketkit_core::{
    AssetRecord, CancellationToken, Collection, DownloadOutcome, MarketResult, MarketplaceClient,
    ProgressCallback, Query,
};
use marketkit_memory::{
    AsyncMemoryClient, AsyncStaticAuthProvider, Catalog, MemoryClient, StaticAuthConfig,
    StaticAuthProvider,
};

/// Size of the `large` payload: three full 64 KiB chunks plus a tail.
pub const LARGE_SIZE: usize = 200_000;

pub fn auth_config() -> StaticAuthConfig {
    StaticAuthConfig::new("https://assets.example.com/api/", "test-token")
        .with_endpoint("assets", "v1/assets")
}

/// Assets `a`, `b`, `c` plus payload variants.
///
/// - `a`: small payload with a suggested filename
/// - `b`: no payload
/// - `c`: zero-byte payload, named from its title
/// - `large`: `LARGE_SIZE` bytes
/// - `evil`: suggested filename escaping the output directory
/// - `flaky`: source fails after a few bytes
pub fn catalog() -> Catalog {
    let large: Vec<u8> = (0..LARGE_SIZE).map(|i| (i % 251) as u8).collect();
    Catalog::new()
        .with_asset(
            AssetRecord::new("a", "Mossy Rocks")
                .with_description("Photoscanned rocks")
                .with_extra("price", 12),
        )
        .and_then(|c| c.with_asset(AssetRecord::new("b", "Pine Trees").with_extra("tags", "nature")))
        .and_then(|c| c.with_asset(AssetRecord::new("c", "Empty Pack")))
        .and_then(|c| c.with_asset(AssetRecord::new("large", "Large Terrain")))
        .and_then(|c| c.with_asset(AssetRecord::new("evil", "Evil")))
        .and_then(|c| c.with_asset(AssetRecord::new("flaky", "Flaky Source")))
        .and_then(|c| c.with_payload("a", &b"rock bytes"[..], Some("rocks.zip")))
        .and_then(|c| c.with_payload("c", &b""[..], None))
        .and_then(|c| c.with_payload("large", large, Some("terrain.bin")))
        .and_then(|c| c.with_payload("evil", &b"root::0:0"[..], Some("../../etc/passwd")))
        .and_then(|c| c.with_broken_payload("flaky", &b"half"[..]))
        .expect("fixture catalog is valid")
}

pub fn client() -> MemoryClient {
    let auth = StaticAuthProvider::new(auth_config()).expect("valid auth config");
    MemoryClient::new(auth, catalog())
}

pub fn async_client() -> AsyncMemoryClient {
    let auth = AsyncStaticAuthProvider::new(auth_config()).expect("valid auth config");
    AsyncMemoryClient::new(auth, catalog().with_stream_chunk(50_000))
}

/// Client that counts how often `close()` reaches it.
pub struct CountingClient {
    pub inner: MemoryClient,
    pub closes: Arc<AtomicUsize>,
}

impl CountingClient {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let client = Self {
            inner: client(),
            closes: Arc::clone(&closes),
        };
        (client, closes)
    }
}

impl MarketplaceClient for CountingClient {
    type Auth = StaticAuthProvider;

    fn auth(&self) -> &StaticAuthProvider {
        self.inner.auth()
    }

    fn get_collection(&mut self, query: &Query) -> MarketResult<Collection> {
        self.inner.get_collection(query)
    }

    fn get_asset(&mut self, uid: &str) -> MarketResult<AssetRecord> {
        self.inner.get_asset(uid)
    }

    fn download_asset_with(
        &mut self,
        uid: &str,
        output_dir: &Path,
        progress: Option<&mut dyn ProgressCallback>,
        query: &Query,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        self.inner
            .download_asset_with(uid, output_dir, progress, query, cancel)
    }

    fn close(&mut self) -> MarketResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()
    }
}

/// Entry names in `dir`, sorted.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
