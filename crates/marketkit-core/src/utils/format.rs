//! Human-readable byte counts.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary (1024) steps.
///
/// Bytes are printed as integers, larger units with two decimals. Negative
/// counts format as `"0 B"`.
///
/// ```
/// use marketkit_core::utils::format_bytes;
///
/// assert_eq!(format_bytes(1536_u64), "1.50 KB");
/// assert_eq!(format_bytes(-5_i64), "0 B");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes<T: TryInto<u64>>(byte_count: T) -> String {
    let Ok(bytes) = byte_count.try_into() else {
        return "0 B".to_string();
    };

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}
