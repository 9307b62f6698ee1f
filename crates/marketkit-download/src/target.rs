//! Destination path resolution with directory-escape protection.
//!
//! Candidate filenames come from remote data and are untrusted. Resolution
//! rejects anything that names a path rather than a file, sanitizes the rest,
//! and verifies containment on canonical (symlink-resolved) paths.

use std::path::{Path, PathBuf};

use marketkit_core::utils::{safe_create_directory, sanitize_filename};
use marketkit_core::{MarketError, MarketResult};

/// A validated destination inside a canonical root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Canonical root directory.
    pub root: PathBuf,
    /// Final file path, `root/file_name`.
    pub path: PathBuf,
    /// Sanitized filename.
    pub file_name: String,
}

/// Resolve `candidate` under `root`.
///
/// Fails with `Validation` when the candidate contains a path separator, a
/// `..` segment or control characters (checked before touching the
/// filesystem), when it sanitizes to nothing, when `root` cannot be created,
/// or when an existing target resolves outside the root.
pub fn resolve_target(root: &Path, candidate: &str) -> MarketResult<ResolvedTarget> {
    reject_path_like(candidate)?;
    let file_name = sanitize_filename(candidate)?;

    safe_create_directory(root)?;
    let canonical_root = root.canonicalize().map_err(|e| {
        MarketError::validation(format!("cannot resolve '{}': {e}", root.display()))
    })?;

    let path = canonical_root.join(&file_name);
    ensure_contained(&canonical_root, &path)?;

    Ok(ResolvedTarget {
        root: canonical_root,
        path,
        file_name,
    })
}

fn reject_path_like(candidate: &str) -> MarketResult<()> {
    if candidate.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(MarketError::validation(format!(
            "filename '{candidate}' contains a '..' segment"
        )));
    }
    if candidate.contains(['/', '\\']) {
        return Err(MarketError::validation(format!(
            "filename '{candidate}' contains a path separator"
        )));
    }
    if candidate.chars().any(char::is_control) {
        return Err(MarketError::validation(
            "filename contains control characters",
        ));
    }
    Ok(())
}

/// Containment check for a path that may already exist (possibly as a
/// symlink). A missing path is contained by construction.
fn ensure_contained(canonical_root: &Path, path: &Path) -> MarketResult<()> {
    if std::fs::symlink_metadata(path).is_err() {
        return Ok(());
    }

    let resolved = path.canonicalize().map_err(|e| {
        MarketError::validation(format!(
            "cannot resolve existing target '{}': {e}",
            path.display()
        ))
    })?;
    if !resolved.starts_with(canonical_root) {
        return Err(MarketError::validation(format!(
            "target '{}' escapes download directory '{}'",
            path.display(),
            canonical_root.display()
        )));
    }
    if resolved.is_dir() {
        return Err(MarketError::validation(format!(
            "target '{}' is a directory",
            path.display()
        )));
    }
    Ok(())
}
