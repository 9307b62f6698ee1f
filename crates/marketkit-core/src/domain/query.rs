//! Free-form query parameters passed to platform clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed parameters for `get_collection` and `download_asset`.
///
/// The core never interprets keys; each platform documents the ones it reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    params: Map<String, Value>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.params.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.params.get(key).and_then(Value::as_bool)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Map<String, Value>> for Query {
    fn from(params: Map<String, Value>) -> Self {
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_getters() {
        let query = Query::new()
            .with("category", "textures")
            .with("limit", 25)
            .with("free", true);

        assert_eq!(query.get_str("category"), Some("textures"));
        assert_eq!(query.get_u64("limit"), Some(25));
        assert_eq!(query.get_bool("free"), Some(true));
        assert_eq!(query.get_str("limit"), None);
        assert!(query.get("nope").is_none());
    }

    #[test]
    fn test_transparent_serde() {
        let query: Query = serde_json::from_value(json!({"page": 2})).unwrap();
        assert_eq!(query.get_u64("page"), Some(2));
        assert_eq!(serde_json::to_value(&query).unwrap(), json!({"page": 2}));
        assert!(Query::new().is_empty());
    }
}
