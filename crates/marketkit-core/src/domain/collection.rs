//! Read-only collection of asset records.
//!
//! A [`Collection`] preserves the order in which assets were supplied and
//! guarantees that `uid` values are unique. Query operations never mutate the
//! collection; derived collections are new values.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::asset::AssetRecord;
use crate::error::{MarketError, MarketResult};

/// Ordered, immutable view over a list of asset records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCollection")]
pub struct Collection {
    assets: Vec<AssetRecord>,
    /// Total number of assets on the remote side. May exceed `assets.len()`
    /// for paginated results.
    #[serde(skip_serializing_if = "Option::is_none")]
    total_count: Option<u64>,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(default)]
    assets: Vec<AssetRecord>,
    #[serde(default)]
    total_count: Option<u64>,
}

impl TryFrom<RawCollection> for Collection {
    type Error = MarketError;

    fn try_from(raw: RawCollection) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.assets)?.with_total_count(raw.total_count))
    }
}

impl Collection {
    /// Build a collection, rejecting duplicate uids.
    pub fn new(assets: Vec<AssetRecord>) -> MarketResult<Self> {
        let mut seen = HashSet::with_capacity(assets.len());
        for asset in &assets {
            if !seen.insert(asset.uid()) {
                return Err(MarketError::validation(format!(
                    "duplicate asset uid '{}' in collection",
                    asset.uid()
                )));
            }
        }
        Ok(Self {
            assets,
            total_count: None,
        })
    }

    /// An empty collection.
    pub const fn empty() -> Self {
        Self {
            assets: Vec::new(),
            total_count: None,
        }
    }

    /// Set the remote total count hint.
    #[must_use]
    pub const fn with_total_count(mut self, total_count: Option<u64>) -> Self {
        self.total_count = total_count;
        self
    }

    pub const fn len(&self) -> usize {
        self.assets.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub const fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Whether the remote side reports more assets than were materialized.
    pub fn has_more(&self) -> bool {
        self.total_count
            .is_some_and(|total| total > self.assets.len() as u64)
    }

    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetRecord> {
        self.assets.iter()
    }

    /// Uids in collection order.
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(AssetRecord::uid)
    }

    /// Keep the records matching `predicate`, in their original order.
    ///
    /// The result's `total_count` is the number of matches; pagination hints
    /// from the source collection do not survive a filter.
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&AssetRecord) -> bool,
    {
        let assets: Vec<AssetRecord> = self
            .assets
            .iter()
            .filter(|asset| predicate(asset))
            .cloned()
            .collect();
        let total = assets.len() as u64;
        Self {
            assets,
            total_count: Some(total),
        }
    }

    /// First record with the given uid.
    pub fn find_by_uid(&self, uid: &str) -> Option<&AssetRecord> {
        self.assets.iter().find(|asset| asset.uid() == uid)
    }

    pub fn into_assets(self) -> Vec<AssetRecord> {
        self.assets
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a AssetRecord;
    type IntoIter = std::slice::Iter<'a, AssetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

impl IntoIterator for Collection {
    type Item = AssetRecord;
    type IntoIter = std::vec::IntoIter<AssetRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Collection {
        Collection::new(vec![
            AssetRecord::new("a", "Alpha").with_extra("category", "props"),
            AssetRecord::new("b", "Beta").with_description("Second"),
            AssetRecord::new("c", "Gamma").with_extra("category", "props"),
        ])
        .unwrap()
        .with_total_count(Some(40))
    }

    #[test]
    fn test_empty_collection() {
        let collection = Collection::empty();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
        assert!(collection.total_count().is_none());
        assert!(!collection.has_more());
    }

    #[test]
    fn test_duplicate_uid_rejected() {
        let err = Collection::new(vec![
            AssetRecord::new("x", "One"),
            AssetRecord::new("x", "Two"),
        ])
        .unwrap_err();
        assert!(matches!(err, MarketError::Validation { .. }));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_filter_by_uid_keeps_fields() {
        let collection = sample();
        let filtered = collection.filter(|a| a.uid() == "b");

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.total_count(), Some(1));
        assert_eq!(filtered.assets()[0], *collection.find_by_uid("b").unwrap());
        assert_eq!(filtered.assets()[0].description(), Some("Second"));
        // Source untouched
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.total_count(), Some(40));
    }

    #[test]
    fn test_filter_preserves_order() {
        let filtered = sample().filter(|a| a.extra_str("category") == Some("props"));
        assert_eq!(filtered.uids().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!filtered.has_more());
    }

    #[test]
    fn test_filter_then_find_matches_predicate_and_membership() {
        let collection = sample();
        let predicate = |a: &AssetRecord| a.title().starts_with('G') || a.uid() == "a";
        let filtered = collection.filter(predicate);

        for uid in ["a", "b", "c", "missing"] {
            let expected = collection.find_by_uid(uid).is_some_and(predicate);
            assert_eq!(filtered.find_by_uid(uid).is_some(), expected, "uid {uid}");
        }
    }

    #[test]
    fn test_find_by_uid_missing() {
        assert!(sample().find_by_uid("zzz").is_none());
    }

    #[test]
    fn test_has_more_with_pagination_hint() {
        assert!(sample().has_more());
        let exact = Collection::new(vec![AssetRecord::new("a", "A")])
            .unwrap()
            .with_total_count(Some(1));
        assert!(!exact.has_more());
    }

    #[test]
    fn test_deserialize_validates_uniqueness() {
        let ok: Collection = serde_json::from_value(json!({
            "assets": [{"uid": "a", "title": "A"}],
            "total_count": 10
        }))
        .unwrap();
        assert_eq!(ok.total_count(), Some(10));

        let dup = serde_json::from_value::<Collection>(json!({
            "assets": [{"uid": "a", "title": "A"}, {"uid": "a", "title": "B"}]
        }));
        assert!(dup.is_err());
    }
}
