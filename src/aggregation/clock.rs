//! The configured timezone and the current moment in it.

use std::fmt;

use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, macros::time};
use time_tz::{Offset, OffsetDateTimeExt, TimeZone, Tz};

/// Reads moments and calendar days in one timezone.
///
/// The UTC offset is looked up for each moment separately, so a day on the
/// other side of a daylight saving change gets that day's offset rather than
/// today's.
#[derive(Clone, Copy)]
pub struct LocalClock {
    timezone: &'static Tz,
    now: OffsetDateTime,
}

impl LocalClock {
    /// A clock for `timezone` stopped at `now`.
    pub fn new(timezone: &'static Tz, now: OffsetDateTime) -> Self {
        Self {
            timezone,
            now: now.to_timezone(timezone),
        }
    }

    /// The current moment in local time.
    pub fn now(&self) -> OffsetDateTime {
        self.now
    }

    /// The current local calendar day.
    pub fn today(&self) -> Date {
        self.now.date()
    }

    /// `moment` as a local time.
    pub fn to_local(&self, moment: OffsetDateTime) -> OffsetDateTime {
        moment.to_timezone(self.timezone)
    }

    /// The moment the local wall clock reads `wall_clock`.
    ///
    /// A reading skipped by a daylight saving change is read with the offset
    /// from before the change.
    pub fn assume_local(&self, wall_clock: PrimitiveDateTime) -> OffsetDateTime {
        let guess = wall_clock.assume_offset(self.offset_at(wall_clock.assume_utc()));
        wall_clock.assume_offset(self.offset_at(guess))
    }

    /// Local midnight at the start of `date`.
    pub fn start_of_day(&self, date: Date) -> OffsetDateTime {
        self.assume_local(PrimitiveDateTime::new(date, Time::MIDNIGHT))
    }

    /// The last millisecond of `date` in local time.
    pub fn end_of_day(&self, date: Date) -> OffsetDateTime {
        self.assume_local(PrimitiveDateTime::new(date, time!(23:59:59.999)))
    }

    fn offset_at(&self, moment: OffsetDateTime) -> UtcOffset {
        self.timezone.get_offset_utc(&moment).to_utc()
    }
}

impl fmt::Debug for LocalClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalClock")
            .field("timezone", &self.timezone.name())
            .field("now", &self.now)
            .finish()
    }
}
