use crate::SECTOR_SIZE;

/// Split a byte length into whole sectors and the leftover bytes.
///
/// A non-zero remainder means the length is not a sector multiple; callers
/// warn about it and carry on with the truncated sector count.
pub fn sectors_from_bytes(bytes: u64) -> (u64, u64) {
    let sector = SECTOR_SIZE as u64;
    (bytes / sector, bytes % sector)
}

/// Format a byte count with fractional KB/MB/GB (e.g., "1.5 KB", "4.3 GB").
pub fn format_bytes_approx(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
