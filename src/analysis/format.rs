//! Formatting and scoring primitives shared across the analysis pipeline

use crate::types::Severity;

/// Default byte thresholds for severity bucketing
pub const BYTES_MODERATE: u64 = 100_000;
pub const BYTES_SERIOUS: u64 = 300_000;
pub const BYTES_CRITICAL: u64 = 500_000;

/// Default millisecond thresholds for severity bucketing
pub const MS_MODERATE: f64 = 300.0;
pub const MS_SERIOUS: f64 = 800.0;
pub const MS_CRITICAL: f64 = 1500.0;

/// Default URL display width
pub const URL_MAX_LENGTH: usize = 50;

/// Format a byte count for display.
///
/// Below 1 KiB the raw count is shown; KiB values are rounded whole
/// numbers; MiB values keep one decimal.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{} KiB", (bytes as f64 / 1024.0).round() as u64)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Shorten a URL to at most `max_length` characters, ellipsis included.
pub fn truncate_url(url: &str, max_length: usize) -> String {
    let char_count = url.chars().count();
    if char_count <= max_length {
        return url.to_string();
    }
    let kept: String = url.chars().take(max_length.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Normalized 0-1 score with linear interpolation between thresholds.
///
/// `value <= good` scores 1, `value >= poor` scores 0. Callers must pass
/// `poor > good`.
pub fn calculate_score(value: f64, good_threshold: f64, poor_threshold: f64) -> f64 {
    if value <= good_threshold {
        1.0
    } else if value >= poor_threshold {
        0.0
    } else {
        1.0 - (value - good_threshold) / (poor_threshold - good_threshold)
    }
}

/// Bucket a byte count into a severity with the default thresholds.
pub fn severity_by_bytes(bytes: u64) -> Severity {
    severity_by_bytes_with(bytes, BYTES_MODERATE, BYTES_SERIOUS, BYTES_CRITICAL)
}

/// Bucket a byte count into a severity. Lower bounds are inclusive and the
/// critical bound wins first.
pub fn severity_by_bytes_with(bytes: u64, moderate: u64, serious: u64, critical: u64) -> Severity {
    if bytes >= critical {
        Severity::Critical
    } else if bytes >= serious {
        Severity::Serious
    } else if bytes >= moderate {
        Severity::Moderate
    } else {
        Severity::Minor
    }
}

/// Bucket a millisecond count into a severity with the default thresholds.
pub fn severity_by_time(ms: f64) -> Severity {
    severity_by_time_with(ms, MS_MODERATE, MS_SERIOUS, MS_CRITICAL)
}

/// Bucket a millisecond count into a severity. Lower bounds are inclusive
/// and the critical bound wins first.
pub fn severity_by_time_with(ms: f64, moderate: f64, serious: f64, critical: f64) -> Severity {
    if ms >= critical {
        Severity::Critical
    } else if ms >= serious {
        Severity::Serious
    } else if ms >= moderate {
        Severity::Moderate
    } else {
        Severity::Minor
    }
}

/// Format a cache TTL in milliseconds as the largest whole unit, floored.
pub fn format_cache_ttl(ms: u64) -> String {
    const SECOND: u64 = 1000;
    const MINUTE: u64 = 60 * SECOND;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const YEAR: u64 = 365 * DAY;

    if ms == 0 {
        "No cache".to_string()
    } else if ms < MINUTE {
        format!("{}s", ms / SECOND)
    } else if ms < HOUR {
        format!("{}m", ms / MINUTE)
    } else if ms < DAY {
        format!("{}h", ms / HOUR)
    } else if ms < YEAR {
        format!("{}d", ms / DAY)
    } else {
        format!("{}y", ms / YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_boundaries() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1 KiB");
        assert_eq!(format_bytes(150_000), "146 KiB");
        assert_eq!(format_bytes(1_048_576), "1.0 MiB");
        assert_eq!(format_bytes(2_621_440), "2.5 MiB");
    }

    #[test]
    fn test_truncate_url_short_unchanged() {
        let url = "https://example.com/a.js";
        assert_eq!(truncate_url(url, 50), url);
    }

    #[test]
    fn test_truncate_url_exact_length() {
        let url = "https://example.com/assets/js/vendor/analytics-bundle.min.js";
        let truncated = truncate_url(url, 50);
        assert_eq!(truncated.chars().count(), 50);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_calculate_score_boundaries() {
        assert_eq!(calculate_score(200.0, 200.0, 500.0), 1.0);
        assert_eq!(calculate_score(500.0, 200.0, 500.0), 0.0);
        assert_eq!(calculate_score(350.0, 200.0, 500.0), 0.5);
        assert_eq!(calculate_score(100.0, 200.0, 500.0), 1.0);
        assert_eq!(calculate_score(900.0, 200.0, 500.0), 0.0);
    }

    #[test]
    fn test_severity_by_bytes_boundaries() {
        assert_eq!(severity_by_bytes(99_999), Severity::Minor);
        assert_eq!(severity_by_bytes(100_000), Severity::Moderate);
        assert_eq!(severity_by_bytes(300_000), Severity::Serious);
        assert_eq!(severity_by_bytes(500_000), Severity::Critical);
        assert_eq!(severity_by_bytes(499_999), Severity::Serious);
    }

    #[test]
    fn test_severity_with_custom_thresholds() {
        assert_eq!(severity_by_bytes_with(35_000, 30_000, 60_000, 100_000), Severity::Moderate);
        assert_eq!(severity_by_bytes_with(100_000, 30_000, 60_000, 100_000), Severity::Critical);
        assert_eq!(severity_by_time_with(600.0, 250.0, 500.0, 1000.0), Severity::Serious);
    }

    #[test]
    fn test_severity_by_time_boundaries() {
        assert_eq!(severity_by_time(299.0), Severity::Minor);
        assert_eq!(severity_by_time(300.0), Severity::Moderate);
        assert_eq!(severity_by_time(800.0), Severity::Serious);
        assert_eq!(severity_by_time(1500.0), Severity::Critical);
    }

    #[test]
    fn test_format_cache_ttl() {
        assert_eq!(format_cache_ttl(0), "No cache");
        assert_eq!(format_cache_ttl(30_000), "30s");
        assert_eq!(format_cache_ttl(90_000), "1m");
        assert_eq!(format_cache_ttl(3_600_000), "1h");
        assert_eq!(format_cache_ttl(86_400_000), "1d");
        assert_eq!(format_cache_ttl(604_800_000), "7d");
        assert_eq!(format_cache_ttl(31_536_000_000), "1y");
    }

    #[test]
    fn test_format_cache_ttl_floors() {
        // 1h 59m floors to 1h, never rounds up
        assert_eq!(format_cache_ttl(7_140_000), "1h");
        // 59s stays in seconds
        assert_eq!(format_cache_ttl(59_999), "59s");
    }
}
