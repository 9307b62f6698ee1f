//! In-memory asset catalog.

use std::io::{Cursor, Read};

use bytes::Bytes;
use futures_util::StreamExt;
use marketkit_core::{
    AssetRecord, AsyncSource, BlockingSource, Collection, MarketError, MarketResult, Query,
    ResolvedSource,
};

/// Downloadable content attached to an asset.
#[derive(Debug, Clone)]
struct Payload {
    data: Bytes,
    filename: Option<String>,
    /// Fail with a network error after `data` has been delivered.
    broken: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    asset: AssetRecord,
    payload: Option<Payload>,
}

/// Ordered list of assets with optional payloads.
///
/// Recognized query keys for [`Catalog::query`]:
/// - `search`: case-insensitive substring of the title
/// - `offset`, `limit`: pagination over the matches
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
    stream_chunk: Option<usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load asset records from a JSON array.
    pub fn from_json(json: &str) -> MarketResult<Self> {
        let assets: Vec<AssetRecord> = serde_json::from_str(json)
            .map_err(|e| MarketError::validation(format!("invalid catalog JSON: {e}")))?;
        assets
            .into_iter()
            .try_fold(Self::new(), |catalog, asset| catalog.with_asset(asset))
    }

    /// Add an asset. Fails with `Validation` if its uid is already present.
    pub fn with_asset(mut self, asset: AssetRecord) -> MarketResult<Self> {
        if self.entry(asset.uid()).is_some() {
            return Err(MarketError::validation(format!(
                "duplicate asset uid '{}' in catalog",
                asset.uid()
            )));
        }
        self.entries.push(Entry {
            asset,
            payload: None,
        });
        Ok(self)
    }

    /// Attach downloadable content to an existing asset.
    pub fn with_payload(
        self,
        uid: &str,
        data: impl Into<Bytes>,
        filename: Option<&str>,
    ) -> MarketResult<Self> {
        self.set_payload(uid, data.into(), filename, false)
    }

    /// Attach content whose source fails after delivering `data`.
    pub fn with_broken_payload(self, uid: &str, data: impl Into<Bytes>) -> MarketResult<Self> {
        self.set_payload(uid, data.into(), None, true)
    }

    /// Split async payload streams into items of `size` bytes. By default a
    /// payload is one stream item.
    #[must_use]
    pub fn with_stream_chunk(mut self, size: usize) -> Self {
        self.stream_chunk = Some(size.max(1));
        self
    }

    fn set_payload(
        mut self,
        uid: &str,
        data: Bytes,
        filename: Option<&str>,
        broken: bool,
    ) -> MarketResult<Self> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.asset.uid() == uid)
            .ok_or_else(|| MarketError::not_found(uid))?;
        entry.payload = Some(Payload {
            data,
            filename: filename.map(str::to_string),
            broken,
        });
        Ok(self)
    }

    fn entry(&self, uid: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.asset.uid() == uid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up one asset.
    pub fn asset(&self, uid: &str) -> MarketResult<AssetRecord> {
        self.entry(uid)
            .map(|e| e.asset.clone())
            .ok_or_else(|| MarketError::not_found(uid))
    }

    /// Matching assets, paginated. `total_count` is the number of matches
    /// before pagination.
    pub fn query(&self, query: &Query) -> MarketResult<Collection> {
        let needle = query.get_str("search").map(str::to_lowercase);
        let matches: Vec<&AssetRecord> = self
            .entries
            .iter()
            .map(|e| &e.asset)
            .filter(|a| {
                needle
                    .as_deref()
                    .is_none_or(|n| a.title().to_lowercase().contains(n))
            })
            .collect();

        let offset = usize::try_from(query.get_u64("offset").unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .get_u64("limit")
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        let page = matches
            .iter()
            .skip(offset)
            .take(limit)
            .map(|a| (*a).clone())
            .collect();

        Ok(Collection::new(page)?.with_total_count(Some(matches.len() as u64)))
    }

    /// Blocking source for `uid`, `None` if it has no payload.
    pub fn blocking_source(&self, uid: &str) -> MarketResult<Option<ResolvedSource<BlockingSource>>> {
        let entry = self.entry(uid).ok_or_else(|| MarketError::not_found(uid))?;
        Ok(entry.payload.as_ref().map(|payload| {
            let total = Some(payload.data.len() as u64);
            let source = if payload.broken {
                BlockingSource::new(
                    BrokenReader {
                        inner: Cursor::new(payload.data.clone()),
                    },
                    None,
                )
            } else {
                BlockingSource::new(Cursor::new(payload.data.clone()), total)
            };
            resolved(source, payload.filename.as_deref())
        }))
    }

    /// Async source for `uid`, `None` if it has no payload.
    pub fn async_source(&self, uid: &str) -> MarketResult<Option<ResolvedSource<AsyncSource>>> {
        let entry = self.entry(uid).ok_or_else(|| MarketError::not_found(uid))?;
        Ok(entry.payload.as_ref().map(|payload| {
            let chunk = self.stream_chunk.unwrap_or_else(|| payload.data.len().max(1));
            let mut items: Vec<Result<Bytes, MarketError>> = split(&payload.data, chunk)
                .into_iter()
                .map(Ok)
                .collect();
            let total = if payload.broken {
                items.push(Err(reset()));
                None
            } else {
                Some(payload.data.len() as u64)
            };
            let source = AsyncSource::new(futures_util::stream::iter(items).boxed(), total);
            resolved(source, payload.filename.as_deref())
        }))
    }
}

fn resolved<S>(source: S, filename: Option<&str>) -> ResolvedSource<S> {
    let resolved = ResolvedSource::new(source);
    match filename {
        Some(name) => resolved.with_filename(name),
        None => resolved,
    }
}

fn split(data: &Bytes, chunk: usize) -> Vec<Bytes> {
    let mut rest = data.clone();
    let mut chunks = Vec::new();
    while !rest.is_empty() {
        chunks.push(rest.split_to(rest.len().min(chunk)));
    }
    chunks
}

fn reset() -> MarketError {
    MarketError::network("connection reset by peer")
}

/// Reader that fails once its data is exhausted.
struct BrokenReader {
    inner: Cursor<Bytes>,
}

impl Read for BrokenReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(std::io::Error::other(reset())),
            n => Ok(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_asset(AssetRecord::new("a", "Mossy Rocks"))
            .unwrap()
            .with_asset(AssetRecord::new("b", "Pine Trees"))
            .unwrap()
            .with_asset(AssetRecord::new("c", "Rock Cliffs"))
            .unwrap()
            .with_payload("a", &b"rock data"[..], Some("rocks.zip"))
            .unwrap()
    }

    #[test]
    fn test_duplicate_uid_rejected() {
        let err = catalog()
            .with_asset(AssetRecord::new("a", "Again"))
            .unwrap_err();
        assert!(matches!(err, MarketError::Validation { .. }));
    }

    #[test]
    fn test_payload_requires_asset() {
        assert!(matches!(
            catalog().with_payload("zzz", Bytes::new(), None),
            Err(MarketError::NotFound { .. })
        ));
    }

    #[test]
    fn test_search_and_pagination() {
        let catalog = catalog();
        let all = catalog.query(&Query::new()).unwrap();
        assert_eq!(all.uids().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let rocks = catalog.query(&Query::new().with("search", "ROCK")).unwrap();
        assert_eq!(rocks.uids().collect::<Vec<_>>(), vec!["a", "c"]);

        let page = catalog
            .query(&Query::new().with("offset", 1).with("limit", 1))
            .unwrap();
        assert_eq!(page.uids().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(page.total_count(), Some(3));
        assert!(page.has_more());
    }

    #[test]
    fn test_sources() {
        let catalog = catalog();
        let mut source = catalog.blocking_source("a").unwrap().unwrap();
        assert_eq!(source.filename.as_deref(), Some("rocks.zip"));
        assert_eq!(source.source.total, Some(9));
        let mut buf = Vec::new();
        source.source.reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"rock data");

        assert!(catalog.blocking_source("b").unwrap().is_none());
        assert!(catalog.async_source("missing").is_err());
    }

    #[test]
    fn test_broken_blocking_source_fails_after_data() {
        let catalog = catalog().with_broken_payload("b", &b"partial"[..]).unwrap();
        let mut source = catalog.blocking_source("b").unwrap().unwrap();
        let mut buf = [0_u8; 64];
        assert_eq!(source.source.reader.read(&mut buf).unwrap(), 7);
        let err = source.source.reader.read(&mut buf).unwrap_err();
        assert!(matches!(
            MarketError::from_source_io(&err),
            MarketError::Network { .. }
        ));
    }

    #[test]
    fn test_async_source_chunking() {
        let catalog = catalog().with_stream_chunk(4);
        let source = catalog.async_source("a").unwrap().unwrap();
        let items: Vec<_> = tokio_test::block_on(source.source.stream.collect::<Vec<_>>());
        let sizes: Vec<usize> = items.into_iter().map(|i| i.unwrap().len()).collect();
        assert_eq!(sizes, vec![4, 4, 1]);
    }

    #[test]
    fn test_from_json() {
        let catalog = Catalog::from_json(
            r#"[{"uid": "x", "title": "X"}, {"uid": "y", "title": "Y", "extra": {"price": 5}}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.asset("y").unwrap().extra()["price"], 5);

        assert!(Catalog::from_json("not json").is_err());
        assert!(Catalog::from_json(r#"[{"uid": "x", "title": "X"}, {"uid": "x", "title": "Z"}]"#).is_err());
    }
}
