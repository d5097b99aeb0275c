//! Forward-looking retention window.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// True iff `instant` falls within `[reference, reference + horizon_days]`,
/// inclusive at both bounds.
///
/// The reference instant is captured once per pipeline run, so the
/// window stays stable across the whole run even when resolution takes
/// measurable wall-clock time.
pub fn in_window(instant: DateTime<Tz>, reference: DateTime<Tz>, horizon_days: i64) -> bool {
    let end = reference + Duration::days(horizon_days);
    reference <= instant && instant <= end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Madrid;

    #[test]
    fn window_is_inclusive_at_both_bounds() {
        let reference = Madrid.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();

        assert!(in_window(reference, reference, 14));
        assert!(in_window(reference + Duration::days(14), reference, 14));
    }

    #[test]
    fn one_second_past_the_horizon_is_excluded() {
        let reference = Madrid.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
        let just_past = reference + Duration::days(14) + Duration::seconds(1);

        assert!(!in_window(just_past, reference, 14));
    }

    #[test]
    fn past_events_are_excluded() {
        let reference = Madrid.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();

        assert!(!in_window(reference - Duration::seconds(1), reference, 14));
    }
}
