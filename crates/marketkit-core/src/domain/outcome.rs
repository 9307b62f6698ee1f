//! Download result values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ErrorKind, MarketError};

/// A file placed at its final path by the download engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Final (renamed) location.
    pub path: PathBuf,
    /// Bytes written.
    pub bytes: u64,
}

/// Result of one `download_asset` invocation.
///
/// Download failures are values, not errors: the caller inspects `success`
/// and decides whether to retry, skip, or log. The constructors guarantee that
/// a successful outcome carries no error and a failed one always does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadOutcome {
    success: bool,
    asset_uid: String,
    files: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    metadata: Map<String, Value>,
}

impl DownloadOutcome {
    /// A successful download that produced `files`.
    pub fn succeeded(asset_uid: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            success: true,
            asset_uid: asset_uid.into(),
            files,
            error: None,
            error_kind: None,
            metadata: Map::new(),
        }
    }

    /// A failed download. No files are reported.
    pub fn failed(asset_uid: impl Into<String>, cause: &MarketError) -> Self {
        Self {
            success: false,
            asset_uid: asset_uid.into(),
            files: Vec::new(),
            error: Some(cause.to_string()),
            error_kind: Some(cause.kind()),
            metadata: Map::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub const fn success(&self) -> bool {
        self.success
    }

    pub fn asset_uid(&self) -> &str {
        &self.asset_uid
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Category of the failure, if any.
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_has_no_error() {
        let outcome = DownloadOutcome::succeeded("a", vec![PathBuf::from("/tmp/a.zip")])
            .with_metadata("bytes", 42);
        assert!(outcome.success());
        assert!(outcome.error().is_none());
        assert!(outcome.error_kind().is_none());
        assert_eq!(outcome.files().len(), 1);
        assert_eq!(outcome.metadata()["bytes"], 42);
    }

    #[test]
    fn test_failed_carries_message_and_kind() {
        let outcome = DownloadOutcome::failed("missing", &MarketError::not_found("missing"));
        assert!(!outcome.success());
        assert!(outcome.files().is_empty());
        assert!(outcome.error().unwrap().contains("missing"));
        assert_eq!(outcome.error_kind(), Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = DownloadOutcome::failed("x", &MarketError::Cancelled);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_kind"], "cancelled");

        let back: DownloadOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }
}
