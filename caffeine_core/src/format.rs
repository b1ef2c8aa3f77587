//! Human-readable "time since" labels.

use chrono::{DateTime, Utc};

/// Describe how long ago `at` was, relative to `now`
///
/// Uses the largest whole unit: `"2 days"`, `"1 hour"`, `"15 minutes"`.
/// Anything under a minute (or in the future) is `"just now"`.
pub fn time_since(now: DateTime<Utc>, at: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds();
    let days = seconds / 86_400;
    let hours = seconds / 3_600;
    let minutes = seconds / 60;

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{} {}s", n, unit)
    } else {
        format!("{} {}", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_units() {
        assert_eq!(time_since(now(), now() - Duration::seconds(30)), "just now");
        assert_eq!(time_since(now(), now() - Duration::minutes(1)), "1 minute");
        assert_eq!(time_since(now(), now() - Duration::minutes(59)), "59 minutes");
        assert_eq!(time_since(now(), now() - Duration::minutes(61)), "1 hour");
        assert_eq!(time_since(now(), now() - Duration::hours(23)), "23 hours");
        assert_eq!(time_since(now(), now() - Duration::hours(49)), "2 days");
    }

    #[test]
    fn test_future_is_just_now() {
        assert_eq!(time_since(now(), now() + Duration::hours(2)), "just now");
    }
}
