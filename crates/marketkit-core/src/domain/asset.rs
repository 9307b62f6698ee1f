//! Asset record domain type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single marketplace asset.
///
/// Records are immutable once built: fields are exposed through getters and
/// the `with_*` builders consume the value. Platform-native fields that the
/// core does not model live in the `extra` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    uid: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    extra: Map<String, Value>,
}

impl AssetRecord {
    /// Create a record with the required fields.
    pub fn new(uid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            title: title.into(),
            description: None,
            created_at: None,
            updated_at: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    #[must_use]
    pub const fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Attach a platform-native field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Replace the whole extension map (e.g. with a raw API object).
    #[must_use]
    pub fn with_extra_map(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// The platform extension map.
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Look up a string-valued extension field.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_minimal_record() {
        let asset = AssetRecord::new("a-1", "Rock Pack");
        assert_eq!(asset.uid(), "a-1");
        assert_eq!(asset.title(), "Rock Pack");
        assert!(asset.description().is_none());
        assert!(asset.created_at().is_none());
        assert!(asset.extra().is_empty());
    }

    #[test]
    fn test_builder_fields() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let asset = AssetRecord::new("a-2", "Trees")
            .with_description("Stylized trees")
            .with_created_at(created)
            .with_updated_at(created)
            .with_extra("publisher", "Acme")
            .with_extra("price", 12);

        assert_eq!(asset.description(), Some("Stylized trees"));
        assert_eq!(asset.created_at(), Some(created));
        assert_eq!(asset.extra_str("publisher"), Some("Acme"));
        assert_eq!(asset.extra()["price"], json!(12));
        assert_eq!(asset.extra_str("price"), None);
    }

    #[test]
    fn test_serde_omits_empty_optionals() {
        let asset = AssetRecord::new("a-3", "Sky");
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value, json!({"uid": "a-3", "title": "Sky"}));

        let parsed: AssetRecord =
            serde_json::from_value(json!({"uid": "a-3", "title": "Sky", "extra": {"k": "v"}}))
                .unwrap();
        assert_eq!(parsed.extra_str("k"), Some("v"));
    }
}
