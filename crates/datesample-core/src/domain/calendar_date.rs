use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Month, Weekday};

use crate::SamplingError;

/// Day-granularity calendar date without a time zone.
///
/// Stepping from one day to the next is a calendar operation, so there is no
/// daylight-saving transition that could skip or repeat a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(Date);

impl CalendarDate {
    /// Parse an ISO `YYYY-MM-DD` date.
    pub fn parse(input: &str) -> Result<Self, SamplingError> {
        let trimmed = input.trim();
        Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| SamplingError::DateType {
                value: input.to_owned(),
            })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, SamplingError> {
        let invalid = || SamplingError::DateType {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub const fn year(self) -> i32 {
        self.0.year()
    }

    pub const fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    pub const fn is_weekend(self) -> bool {
        matches!(self.0.weekday(), Weekday::Saturday | Weekday::Sunday)
    }

    /// The following calendar day, `None` past the last representable date.
    pub const fn next_day(self) -> Option<Self> {
        match self.0.next_day() {
            Some(date) => Some(Self(date)),
            None => None,
        }
    }

    /// Inclusive number of calendar days from `self` to `end`; zero when `end` is earlier.
    pub fn days_through(self, end: Self) -> usize {
        let span = (end.0 - self.0).whole_days();
        if span < 0 {
            0
        } else {
            usize::try_from(span + 1).unwrap_or(usize::MAX)
        }
    }

    pub fn format_iso(self) -> String {
        self.to_string()
    }
}

impl From<Date> for CalendarDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl From<CalendarDate> for Date {
    fn from(value: CalendarDate) -> Self {
        value.0
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
