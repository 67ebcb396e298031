//! Countdown derivation.
//!
//! There is no background timer thread: remaining time is recomputed from
//! the session start on every presentation refresh tick, and expiry is a
//! level-triggered condition the presentation layer answers by calling the
//! session's idempotent `finish`.

use chrono::{DateTime, Utc};

/// Remaining seconds at or below which the display should warn.
pub const WARNING_THRESHOLD_SECS: i64 = 300;

/// Seconds left on the countdown, clamped at zero.
#[must_use]
pub fn remaining_seconds(
    time_limit_seconds: i64,
    started_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    let elapsed = (now - started_at).num_seconds();
    (time_limit_seconds - elapsed).max(0)
}

/// Whether the remaining time is inside the warning window.
#[must_use]
pub fn is_warning(remaining_seconds: i64) -> bool {
    remaining_seconds <= WARNING_THRESHOLD_SECS
}

/// `HH:MM:SS` rendering of a non-negative second count.
#[must_use]
pub fn format_hms(total_seconds: i64) -> String {
    let clamped = total_seconds.max(0);
    let hours = clamped / 3600;
    let minutes = (clamped % 3600) / 60;
    let seconds = clamped % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exani_core::time::fixed_now;

    #[test]
    fn remaining_counts_down_and_clamps_at_zero() {
        let start = fixed_now();
        assert_eq!(remaining_seconds(1800, start, start), 1800);
        assert_eq!(
            remaining_seconds(1800, start, start + Duration::seconds(1750)),
            50
        );
        assert_eq!(
            remaining_seconds(1800, start, start + Duration::seconds(5000)),
            0
        );
    }

    #[test]
    fn warning_window_is_five_minutes() {
        assert!(is_warning(0));
        assert!(is_warning(300));
        assert!(!is_warning(301));
    }

    #[test]
    fn hms_formatting() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(3 * 3600 + 25 * 60 + 7), "03:25:07");
        assert_eq!(format_hms(-5), "00:00:00");
    }
}
