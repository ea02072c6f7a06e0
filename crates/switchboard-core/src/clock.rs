// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide monotonic wall clock.
//!
//! Message and notification timestamps are the sole sort key, so the clock
//! never hands out a value older than the last one it returned, even if the
//! system clock steps backwards.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Timestamp format shared by every persisted row.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const MILLIS_PER_DAY: i64 = 86_400_000;

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Current time in epoch milliseconds, never smaller than a previous result.
pub fn now_millis() -> i64 {
    let wall = Utc::now().timestamp_millis();
    let prev = LAST_MILLIS.fetch_max(wall, Ordering::SeqCst);
    prev.max(wall)
}

/// Current time formatted as an ISO-8601 UTC string with milliseconds.
pub fn now() -> String {
    format_millis(now_millis())
}

/// Format epoch milliseconds with [`TIMESTAMP_FORMAT`].
pub fn format_millis(millis: i64) -> String {
    let dt: DateTime<Utc> = Utc
        .timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now);
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Timestamp `days` days before now, used by age-based cleanup.
///
/// Windows reaching past the Unix epoch clamp to the epoch.
pub fn days_ago(days: u32) -> String {
    let window = i64::from(days) * MILLIS_PER_DAY;
    let cutoff = Utc::now().timestamp_millis().saturating_sub(window).max(0);
    format_millis(cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_non_decreasing() {
        let mut prev = now();
        for _ in 0..1000 {
            let next = now();
            assert!(next >= prev, "{next} < {prev}");
            prev = next;
        }
    }

    #[test]
    fn format_is_fixed_width_and_sortable() {
        assert_eq!(format_millis(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_millis(1_500), "1970-01-01T00:00:01.500Z");
        assert!(format_millis(999) < format_millis(1_000));
    }

    #[test]
    fn days_ago_is_in_the_past() {
        assert!(days_ago(1) < now());
        assert!(days_ago(30) < days_ago(1));
    }

    #[test]
    fn days_ago_clamps_huge_windows_to_epoch() {
        assert_eq!(days_ago(u32::MAX), format_millis(0));
        assert_eq!(days_ago(1_000_000), format_millis(0));
    }
}
