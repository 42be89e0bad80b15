//! Resolving the configured timezone to a clock for the current request.

use time::OffsetDateTime;
use time_tz::Tz;

use crate::{Error, aggregation::LocalClock};

/// Look up a canonical timezone name, e.g. "Pacific/Auckland".
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// A clock reading the current time in `canonical_timezone`.
///
/// Offsets are looked up per moment, so daylight saving changes are picked
/// up without restarting the server.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the timezone name is not known.
pub fn local_clock(canonical_timezone: &str) -> Result<LocalClock, Error> {
    let Some(timezone) = get_timezone(canonical_timezone) else {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        return Err(Error::InvalidTimezoneError(canonical_timezone.to_owned()));
    };

    Ok(LocalClock::new(timezone, OffsetDateTime::now_utc()))
}
