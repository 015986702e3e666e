const BYTES_PER_TB: f64 = 1024.0 * 1024.0 * 1024.0 * 1024.0;

/// Outgoing over included traffic; 0 when nothing is included.
pub fn usage_ratio(outgoing_bytes: u64, included_bytes: u64) -> f64 {
    if included_bytes == 0 {
        return 0.0;
    }
    outgoing_bytes as f64 / included_bytes as f64
}

pub fn format_percentage(ratio: f64) -> String {
    format!("{:.4}%", ratio * 100.0)
}

pub fn bytes_to_tb(bytes: u64) -> String {
    format!("{:.4}", bytes as f64 / BYTES_PER_TB)
}
