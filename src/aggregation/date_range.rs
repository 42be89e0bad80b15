//! Named date ranges and parsing of transaction dates.

use serde::{Deserialize, Serialize};
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use super::clock::LocalClock;

/// Which dates a transaction list should be restricted to.
///
/// The named variants are resolved against a [LocalClock] with
/// [resolve_date_range].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRangeSpec {
    /// No date filtering.
    #[default]
    All,
    /// From midnight today until now.
    Today,
    /// The whole of yesterday.
    Yesterday,
    /// From the most recent Sunday at midnight until now.
    ThisWeek,
    /// From the first of the current month at midnight until now.
    ThisMonth,
    /// The whole of the previous calendar month.
    LastMonth,
    /// Caller supplied bounds. A missing bound leaves that side open.
    Custom {
        /// The earliest moment to include.
        start: Option<OffsetDateTime>,
        /// The latest moment to include.
        end: Option<OffsetDateTime>,
    },
}

/// The ranges a user can pick from a list.
///
/// Unlike [DateRangeSpec], [RangePreset::Custom] carries no bounds. They are
/// supplied separately when converting with [RangePreset::to_spec].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePreset {
    /// See [DateRangeSpec::All].
    #[default]
    All,
    /// See [DateRangeSpec::Today].
    Today,
    /// See [DateRangeSpec::Yesterday].
    Yesterday,
    /// See [DateRangeSpec::ThisWeek].
    ThisWeek,
    /// See [DateRangeSpec::ThisMonth].
    ThisMonth,
    /// See [DateRangeSpec::LastMonth].
    LastMonth,
    /// Explicit start and end dates.
    Custom,
}

impl RangePreset {
    /// Every preset in display order.
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::Today,
        Self::Yesterday,
        Self::ThisWeek,
        Self::ThisMonth,
        Self::LastMonth,
        Self::Custom,
    ];

    /// The value used for this preset in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this_week",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::Custom => "custom",
        }
    }

    /// A human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This week",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
            Self::Custom => "Custom",
        }
    }

    /// Build the range spec for this preset.
    ///
    /// `start` and `end` are only used by [RangePreset::Custom].
    pub fn to_spec(
        self,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> DateRangeSpec {
        match self {
            Self::All => DateRangeSpec::All,
            Self::Today => DateRangeSpec::Today,
            Self::Yesterday => DateRangeSpec::Yesterday,
            Self::ThisWeek => DateRangeSpec::ThisWeek,
            Self::ThisMonth => DateRangeSpec::ThisMonth,
            Self::LastMonth => DateRangeSpec::LastMonth,
            Self::Custom => DateRangeSpec::Custom { start, end },
        }
    }
}

/// Inclusive bounds produced by [resolve_date_range].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    /// The earliest moment in the range, `None` if unbounded.
    pub start: Option<OffsetDateTime>,
    /// The latest moment in the range, `None` if unbounded.
    pub end: Option<OffsetDateTime>,
}

impl ResolvedRange {
    /// A range that accepts every date.
    pub const UNBOUNDED: Self = Self {
        start: None,
        end: None,
    };

    /// Whether at least one side of the range is bounded.
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether `moment` lies within the range, bounds included.
    pub fn contains(&self, moment: OffsetDateTime) -> bool {
        self.start.is_none_or(|start| moment >= start) && self.end.is_none_or(|end| moment <= end)
    }
}

/// Turn a [DateRangeSpec] into concrete bounds.
///
/// Day boundaries are local midnights, each read with the offset in effect
/// on that day.
pub fn resolve_date_range(spec: DateRangeSpec, clock: &LocalClock) -> ResolvedRange {
    let now = clock.now();
    let today = clock.today();

    match spec {
        DateRangeSpec::All => ResolvedRange::UNBOUNDED,
        DateRangeSpec::Today => ResolvedRange {
            start: Some(clock.start_of_day(today)),
            end: Some(now),
        },
        DateRangeSpec::Yesterday => {
            let yesterday = today.saturating_sub(Duration::DAY);

            ResolvedRange {
                start: Some(clock.start_of_day(yesterday)),
                end: Some(clock.end_of_day(yesterday)),
            }
        }
        DateRangeSpec::ThisWeek => {
            let days_since_sunday = today.weekday().number_days_from_sunday();
            let sunday = today.saturating_sub(Duration::days(days_since_sunday.into()));

            ResolvedRange {
                start: Some(clock.start_of_day(sunday)),
                end: Some(now),
            }
        }
        DateRangeSpec::ThisMonth => ResolvedRange {
            start: Some(clock.start_of_day(first_of_month(today))),
            end: Some(now),
        },
        DateRangeSpec::LastMonth => {
            let last_of_previous = first_of_month(today).saturating_sub(Duration::DAY);

            ResolvedRange {
                start: Some(clock.start_of_day(first_of_month(last_of_previous))),
                end: Some(clock.end_of_day(last_of_previous)),
            }
        }
        DateRangeSpec::Custom { start, end } => ResolvedRange { start, end },
    }
}

fn first_of_month(date: Date) -> Date {
    date.saturating_sub(Duration::days(i64::from(date.day()) - 1))
}

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMATS: [&[BorrowedFormatItem]; 3] = [
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
];

/// The accepted shapes of a stored transaction date.
enum TransactionDate {
    /// An RFC 3339 timestamp naming its own offset.
    Instant(OffsetDateTime),
    /// A date-time read off the local wall clock.
    WallClock(PrimitiveDateTime),
    /// A bare calendar day.
    Day(Date),
}

impl TransactionDate {
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
            return Some(Self::Instant(timestamp));
        }

        if let Some(wall_clock) = DATE_TIME_FORMATS
            .iter()
            .find_map(|format| PrimitiveDateTime::parse(value, format).ok())
        {
            return Some(Self::WallClock(wall_clock));
        }

        Date::parse(value, DATE_FORMAT).ok().map(Self::Day)
    }
}

/// Whether `value` is a date [parse_transaction_date] accepts.
pub fn is_valid_transaction_date(value: &str) -> bool {
    TransactionDate::parse(value).is_some()
}

/// Parse an ISO-8601 transaction date as a local moment.
///
/// Accepts a bare date (local midnight), a date-time without an offset (local
/// wall-clock time) and an RFC 3339 timestamp, which is converted to local
/// time. Returns `None` for anything else.
pub fn parse_transaction_date(value: &str, clock: &LocalClock) -> Option<OffsetDateTime> {
    let moment = match TransactionDate::parse(value)? {
        TransactionDate::Instant(timestamp) => clock.to_local(timestamp),
        TransactionDate::WallClock(wall_clock) => clock.assume_local(wall_clock),
        TransactionDate::Day(date) => clock.start_of_day(date),
    };

    Some(moment)
}
