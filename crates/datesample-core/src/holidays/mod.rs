//! Public-holiday lookup collaborator.
//!
//! The sampling core never fetches holidays itself. It consumes a
//! [`HolidaySet`] produced by a [`HolidaySource`]; lookup failures surface as
//! [`HolidayLookupError`] and are never mixed up with validation or sampling
//! errors.
//!
//! # Sources
//!
//! | Source | Upstream |
//! |--------|----------|
//! | [`OpenHolidaysSource`] | `openholidaysapi.org` range query |
//! | [`NagerDateSource`] | `date.nager.at` per-year query |
//! | [`StaticHolidaySource`] | fixed in-memory dates |

mod nager;
mod openholidays;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::ops::RangeInclusive;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_client::{HttpClient, HttpError, HttpErrorKind, HttpResponse};
use crate::{CalendarDate, CountryCode, HolidayConfig};

pub use nager::NagerDateSource;
pub use openholidays::OpenHolidaysSource;

/// Holiday provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayProviderId {
    OpenHolidays,
    NagerDate,
    Static,
}

impl HolidayProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenHolidays => "openholidays",
            Self::NagerDate => "nager",
            Self::Static => "static",
        }
    }
}

impl Display for HolidayProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolidayProviderId {
    type Err = HolidayLookupError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openholidays" | "open_holidays" => Ok(Self::OpenHolidays),
            "nager" | "nager_date" => Ok(Self::NagerDate),
            "static" => Ok(Self::Static),
            _ => Err(HolidayLookupError::invalid_request(format!(
                "unknown holiday provider '{value}', expected openholidays, nager or static"
            ))),
        }
    }
}

/// Holiday lookup failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayLookupErrorKind {
    InvalidRequest,
    Transport,
    Timeout,
    UpstreamStatus,
    Parse,
    Unavailable,
}

/// Structured holiday lookup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayLookupError {
    kind: HolidayLookupErrorKind,
    message: String,
    retryable: bool,
}

impl HolidayLookupError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: HolidayLookupErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn transport(error: &HttpError) -> Self {
        let kind = match error.kind() {
            HttpErrorKind::Timeout => HolidayLookupErrorKind::Timeout,
            _ => HolidayLookupErrorKind::Transport,
        };
        Self {
            kind,
            message: format!("holiday transport error: {}", error.message()),
            retryable: error.retryable(),
        }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        Self {
            kind: HolidayLookupErrorKind::Timeout,
            message: format!("holiday lookup timed out after {timeout_ms}ms"),
            retryable: true,
        }
    }

    pub fn upstream_status(provider: HolidayProviderId, status: u16) -> Self {
        Self {
            kind: HolidayLookupErrorKind::UpstreamStatus,
            message: format!("{provider} returned status {status}"),
            retryable: status == 429 || status >= 500,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: HolidayLookupErrorKind::Parse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: HolidayLookupErrorKind::Unavailable,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> HolidayLookupErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            HolidayLookupErrorKind::InvalidRequest => "holiday.invalid_request",
            HolidayLookupErrorKind::Transport => "holiday.transport",
            HolidayLookupErrorKind::Timeout => "holiday.timeout",
            HolidayLookupErrorKind::UpstreamStatus => "holiday.upstream_status",
            HolidayLookupErrorKind::Parse => "holiday.parse",
            HolidayLookupErrorKind::Unavailable => "holiday.unavailable",
        }
    }
}

impl Display for HolidayLookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for HolidayLookupError {}

/// Country and inclusive date range to look holidays up for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayQuery {
    pub country: CountryCode,
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl HolidayQuery {
    pub fn new(
        country: CountryCode,
        start: CalendarDate,
        end: CalendarDate,
    ) -> Result<Self, HolidayLookupError> {
        if start > end {
            return Err(HolidayLookupError::invalid_request(format!(
                "holiday range start {start} is after end {end}"
            )));
        }
        Ok(Self {
            country,
            start,
            end,
        })
    }

    /// Calendar years touched by the range.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }
}

/// Set of holiday dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidaySet(BTreeSet<CalendarDate>);

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: CalendarDate) -> bool {
        self.0.insert(date)
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.0.contains(&date)
    }

    /// Holidays inside `start..=end`.
    pub fn within(&self, start: CalendarDate, end: CalendarDate) -> Self {
        if start > end {
            return Self::default();
        }
        Self(self.0.range(start..=end).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<CalendarDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<CalendarDate> for HolidaySet {
    fn extend<I: IntoIterator<Item = CalendarDate>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Holiday collaborator contract.
pub trait HolidaySource: Send + Sync {
    fn id(&self) -> HolidayProviderId;

    /// Holidays of `query.country` inside `query.start..=query.end`.
    fn holidays<'a>(
        &'a self,
        query: HolidayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>>;
}

/// Fixed holiday list, independent of the queried country.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidaySource {
    holidays: HolidaySet,
}

impl StaticHolidaySource {
    pub fn new(holidays: impl IntoIterator<Item = CalendarDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl HolidaySource for StaticHolidaySource {
    fn id(&self) -> HolidayProviderId {
        HolidayProviderId::Static
    }

    fn holidays<'a>(
        &'a self,
        query: HolidayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.holidays.within(query.start, query.end)) })
    }
}

/// Stands in for a static provider selected through configuration, which
/// carries no dates of its own.
#[derive(Debug, Clone, Copy, Default)]
struct UnconfiguredStaticSource;

impl HolidaySource for UnconfiguredStaticSource {
    fn id(&self) -> HolidayProviderId {
        HolidayProviderId::Static
    }

    fn holidays<'a>(
        &'a self,
        _query: HolidayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>> {
        Box::pin(async {
            Err(HolidayLookupError::unavailable(
                "the static holiday provider needs explicit dates",
            ))
        })
    }
}

/// Build the HTTP-backed source selected in `config`.
///
/// `Static` has no dates to serve here; its lookups fail as unavailable.
/// Use [`StaticHolidaySource::new`] to supply dates directly.
pub fn source_for(
    config: &HolidayConfig,
    http_client: Arc<dyn HttpClient>,
) -> Arc<dyn HolidaySource> {
    match config.provider {
        HolidayProviderId::OpenHolidays => Arc::new(
            OpenHolidaysSource::new(http_client)
                .with_language(config.language.clone())
                .with_timeout_ms(config.timeout_ms),
        ),
        HolidayProviderId::NagerDate => {
            Arc::new(NagerDateSource::new(http_client).with_timeout_ms(config.timeout_ms))
        }
        HolidayProviderId::Static => Arc::new(UnconfiguredStaticSource),
    }
}

fn ensure_success(
    provider: HolidayProviderId,
    response: &HttpResponse,
) -> Result<(), HolidayLookupError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(HolidayLookupError::upstream_status(provider, response.status))
    }
}

fn parse_upstream_date(
    provider: HolidayProviderId,
    value: &str,
) -> Result<CalendarDate, HolidayLookupError> {
    // Some upstreams send full timestamps; the calendar day is the leading 10 chars.
    let day = value.get(..10).unwrap_or(value);
    CalendarDate::parse(day).map_err(|_| {
        HolidayLookupError::parse(format!("{provider} returned an invalid date '{value}'"))
    })
}
