//! Filename sanitization for untrusted, remotely supplied names.

use crate::error::{MarketError, MarketResult};

/// Characters that are rejected by at least one common filesystem.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Strip characters that are not allowed in filenames.
///
/// Removes `/ \ : * ? " < > |`, then trims leading and trailing dots and
/// spaces. Fails with `Validation` if the input is empty or nothing is left.
/// Applying it to its own output returns the same string.
///
/// ```
/// use marketkit_core::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("My Asset: Version 2.0").unwrap(), "My Asset Version 2.0");
/// assert!(sanitize_filename("///***???").is_err());
/// ```
pub fn sanitize_filename(filename: &str) -> MarketResult<String> {
    if filename.is_empty() {
        return Err(MarketError::validation("filename cannot be empty"));
    }

    let stripped: String = filename
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .collect();
    let sanitized = stripped.trim_matches(|c| c == '.' || c == ' ');

    if sanitized.is_empty() {
        return Err(MarketError::validation(format!(
            "filename '{filename}' contains only invalid characters"
        )));
    }
    Ok(sanitized.to_string())
}
