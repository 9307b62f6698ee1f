//! Directory creation helper.

use std::path::Path;

use crate::error::{MarketError, MarketResult};

/// Create `path` and all missing parents.
///
/// An existing directory is fine. An empty path or any creation failure is a
/// `Validation` error.
pub fn safe_create_directory(path: &Path) -> MarketResult<()> {
    if path.as_os_str().is_empty() {
        return Err(MarketError::validation("directory path cannot be empty"));
    }
    std::fs::create_dir_all(path).map_err(|e| {
        MarketError::validation(format!(
            "failed to create directory '{}': {e}",
            path.display()
        ))
    })
}
