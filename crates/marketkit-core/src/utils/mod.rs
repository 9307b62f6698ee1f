//! Filename, URL, filesystem and formatting helpers.

mod filename;
mod format;
mod fs;
mod url;

pub use self::filename::sanitize_filename;
pub use self::format::format_bytes;
pub use self::fs::safe_create_directory;
pub use self::url::{parse_url, redact_url, validate_url};
