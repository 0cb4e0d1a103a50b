//! Timestamp formatting for item headers and comment bylines.

use chrono::{DateTime, Local, Utc};

/// Unit table for relative ages, largest first.
const AGE_UNITS: [(i64, &str); 5] = [
    (31_536_000, "years"),
    (2_592_000, "months"),
    (86_400, "days"),
    (3_600, "hours"),
    (60, "minutes"),
];

/// Current wall-clock time in seconds since the Unix epoch.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// Formats an elapsed duration in seconds as "`{n} {unit} ago`".
///
/// Picks the first unit whose quotient is strictly greater than one, so
/// exactly one day reads as "24 hours ago" while 90000 seconds reads as
/// "1 days ago". Units are never singularized. Negative input (clock skew,
/// timestamps from the future) is treated as zero.
///
/// ```
/// use hnreader::util::format_age;
///
/// assert_eq!(format_age(90_000), "1 days ago");
/// assert_eq!(format_age(45), "45 seconds ago");
/// assert_eq!(format_age(3_700), "1 hours ago");
/// ```
pub fn format_age(elapsed_secs: i64) -> String {
    let secs = elapsed_secs.max(0);
    for (unit_secs, name) in AGE_UNITS {
        if secs > unit_secs {
            return format!("{} {} ago", secs / unit_secs, name);
        }
    }
    format!("{} seconds ago", secs)
}

/// Relative age of `timestamp` as seen from `now` (both Unix seconds).
pub fn time_since(timestamp: i64, now: i64) -> String {
    format_age(now.saturating_sub(timestamp))
}

/// Absolute local time for the comments feed, e.g. `2024-03-09 14:05:33`.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reports_largest_unit_exceeding_one() {
        assert_eq!(format_age(90_000), "1 days ago");
        assert_eq!(format_age(45), "45 seconds ago");
        assert_eq!(format_age(3_700), "1 hours ago");
        assert_eq!(format_age(7_200 + 1), "2 hours ago");
        assert_eq!(format_age(40_000_000), "1 years ago");
    }

    #[test]
    fn test_exact_unit_boundary_falls_through_to_smaller_unit() {
        assert_eq!(format_age(86_400), "24 hours ago");
        assert_eq!(format_age(3_600), "60 minutes ago");
        assert_eq!(format_age(60), "60 seconds ago");
    }

    #[test]
    fn test_negative_elapsed_clamps_to_zero() {
        assert_eq!(format_age(-30), "0 seconds ago");
        assert_eq!(time_since(1_000, 900), "0 seconds ago");
    }

    #[test]
    fn test_time_since_subtracts_timestamp() {
        assert_eq!(time_since(1_700_000_000, 1_700_000_045), "45 seconds ago");
    }

    #[test]
    fn test_timestamp_formats_in_fixed_layout() {
        let formatted = format_timestamp(1_700_000_000);
        assert_eq!(formatted.len(), "2023-11-14 22:13:20".len());
        assert!(formatted.starts_with("2023-11-1"));
    }

    proptest! {
        #[test]
        fn test_every_age_reads_as_past_tense(secs in any::<i64>()) {
            let formatted = format_age(secs);
            prop_assert!(formatted.ends_with(" ago"));
            let count: i64 = formatted
                .split(' ')
                .next()
                .and_then(|n| n.parse().ok())
                .unwrap_or(-1);
            prop_assert!(count >= 0);
        }
    }
}
