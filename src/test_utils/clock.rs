use time::OffsetDateTime;

use crate::aggregation::LocalClock;

/// A clock for the canonical `timezone` stopped at `now`.
pub(crate) fn clock_at(timezone: &str, now: OffsetDateTime) -> LocalClock {
    let timezone = time_tz::timezones::get_by_name(timezone).expect("Unknown timezone");

    LocalClock::new(timezone, now)
}
