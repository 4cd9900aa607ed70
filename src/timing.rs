use std::time::Duration;

/// Cases taking longer than this are reported when timing is enabled.
pub const SLOW_CASE_THRESHOLD: Duration = Duration::from_millis(100);

const SECONDS_CUTOFF_MS: u128 = 10_000;

/// `~S seconds` from ten seconds upward, `Mms` below.
pub fn human_readable(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms >= SECONDS_CUTOFF_MS {
        format!("~{} seconds", elapsed.as_secs())
    } else {
        format!("{ms}ms")
    }
}

pub fn is_slow(elapsed: Duration) -> bool {
    elapsed > SLOW_CASE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_milliseconds_and_seconds() {
        assert_eq!(human_readable(Duration::from_millis(0)), "0ms");
        assert_eq!(human_readable(Duration::from_millis(9_999)), "9999ms");
        assert_eq!(human_readable(Duration::from_millis(10_000)), "~10 seconds");
        assert_eq!(human_readable(Duration::from_millis(65_432)), "~65 seconds");
    }

    #[test]
    fn threshold_is_exclusive() {
        assert!(!is_slow(Duration::from_millis(100)));
        assert!(is_slow(Duration::from_millis(101)));
    }
}
