//! Compact duration strings

const UNITS: [(u64, &str); 5] = [
    (86_400_000, "d"),
    (3_600_000, "h"),
    (60_000, "m"),
    (1000, "s"),
    (1, "ms"),
];

/// Format milliseconds as `1d 2h 3m 4s 5ms`, omitting zero components.
///
/// Zero formats as an empty string.
pub fn format_duration(ms: u64) -> String {
    let mut remaining = ms;
    let mut parts = Vec::new();

    for (size, suffix) in UNITS {
        let count = remaining / size;
        if count > 0 {
            parts.push(format!("{}{}", count, suffix));
            remaining %= size;
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(format_duration(1000), "1s");
        assert_eq!(format_duration(60_000), "1m");
        assert_eq!(format_duration(3_600_000), "1h");
        assert_eq!(format_duration(86_400_000), "1d");
        assert_eq!(format_duration(500), "500ms");
    }

    #[test]
    fn test_mixed_units() {
        assert_eq!(format_duration(99_123), "1m 39s 123ms");
        assert_eq!(format_duration(3_723_000), "1h 2m 3s");
        assert_eq!(format_duration(90_061_001), "1d 1h 1m 1s 1ms");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_duration(0), "");
    }
}
