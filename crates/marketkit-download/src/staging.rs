//! Temp-file staging and atomic placement.
//!
//! Bytes go to `.<name>.<random>.part` next to the final path. The temp file
//! is deleted when its `TempPath` drops, so any early return discards it;
//! only [`commit`] renames it into place.
//!
//! On unix the staging file is opened with mode `0o666` filtered by the
//! umask, so a committed download gets the same mode as any file created in
//! that directory.

use std::fs::File;

use marketkit_core::{MarketError, MarketResult};
use tempfile::TempPath;

use crate::target::ResolvedTarget;

/// Create the staging file for `target` in the same directory.
pub fn stage(target: &ResolvedTarget) -> MarketResult<(File, TempPath)> {
    let prefix = format!(".{}.", target.file_name);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let staged = builder
        .tempfile_in(&target.root)
        .map_err(|e| {
            MarketError::storage(&target.root, format!("cannot create temporary file: {e}"))
        })?;
    Ok(staged.into_parts())
}

/// Atomically rename the staged file onto the final path.
pub fn commit(temp: TempPath, target: &ResolvedTarget) -> MarketResult<()> {
    temp.persist(&target.path).map_err(|e| {
        MarketError::storage(&target.path, format!("cannot move file into place: {}", e.error))
    })
}
