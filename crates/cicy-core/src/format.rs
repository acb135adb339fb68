//! Human readable sizes.

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

/// Format a byte count the way image notifications show it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: usize) -> String {
    if bytes > MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else if bytes > KIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
