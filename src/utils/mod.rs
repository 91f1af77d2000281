//! Utilities module for logging, error handling, and CLI report formatting

pub mod error;
pub mod logging;

use std::time::Duration;

// Re-export main types for convenience
pub use error::{MnistaError, Result};
pub use logging::{init_logging, LogConfig, LogLevel};

/// Elapsed time for loader reports: milliseconds under a second, then
/// seconds, then minutes and seconds
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    match millis {
        0..=999 => format!("{millis}ms"),
        1_000..=59_999 => format!("{:.1}s", elapsed.as_secs_f64()),
        _ => {
            let secs = elapsed.as_secs();
            format!("{}m {:02}s", secs / 60, secs % 60)
        }
    }
}

/// Item count with comma thousands separators, e.g. `60,000`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;

    let mut groups: Vec<&str> = Vec::new();
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok()),
    );

    groups.join(",")
}

/// Items per second over `elapsed`, rounded to whole items
pub fn format_throughput(items: usize, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return format!("{} items", format_count(items));
    }
    format!("{} items/s", format_count((items as f64 / secs).round() as usize))
}
