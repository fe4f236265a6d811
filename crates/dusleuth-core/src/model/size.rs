/// Size formatting utilities: human-readable byte counts and percentages.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary.

/// SI unit suffixes, one per power of 1000.
const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count into a human-readable string.
///
/// Uses decimal units (kB = 1000). The scaled value is rounded to one
/// decimal; values below 10 keep that decimal (`"1.5 MB"`), larger ones
/// are printed whole (`"83 MB"`). Counts under 10 bytes are printed as-is.
pub fn humanize_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exp = 0;
    let mut scale: u64 = 1;
    while exp + 1 < UNITS.len() && bytes / scale >= 1000 {
        scale *= 1000;
        exp += 1;
    }

    let value = ((bytes as f64 / scale as f64) * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{value:.1} {}", UNITS[exp])
    } else {
        format!("{value:.0} {}", UNITS[exp])
    }
}

/// Format a ratio (0.0–1.0) as a percentage with one decimal, e.g. `"22.2%"`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
