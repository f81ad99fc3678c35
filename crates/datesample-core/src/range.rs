//! Candidate date enumeration.
//!
//! [`DateRange`] is a lazy, restartable description of the days between two
//! dates; [`CandidateSet`] is the materialized, immutable list the sampler
//! draws from.

use std::iter::FusedIterator;

use serde::Serialize;

use crate::holidays::HolidaySet;
use crate::{CalendarDate, SamplingError};

/// Inclusive day range with an optional weekend filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: CalendarDate,
    end: CalendarDate,
    exclude_weekends: bool,
}

impl DateRange {
    pub const fn new(start: CalendarDate, end: CalendarDate) -> Self {
        Self {
            start,
            end,
            exclude_weekends: false,
        }
    }

    pub const fn excluding_weekends(mut self, exclude: bool) -> Self {
        self.exclude_weekends = exclude;
        self
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    pub const fn excludes_weekends(&self) -> bool {
        self.exclude_weekends
    }

    /// Fresh iterator over the eligible days; calling it again restarts the sequence.
    pub fn days(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
            exclude_weekends: self.exclude_weekends,
        }
    }

    /// Calendar days between the endpoints, ignoring the weekend filter.
    pub fn calendar_days(&self) -> usize {
        self.start.days_through(self.end)
    }

    /// Number of eligible days.
    pub fn len(&self) -> usize {
        if self.exclude_weekends {
            self.days().count()
        } else {
            self.calendar_days()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for DateRange {
    type Item = CalendarDate;
    type IntoIter = Days;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

impl IntoIterator for &DateRange {
    type Item = CalendarDate;
    type IntoIter = Days;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<CalendarDate>,
    end: CalendarDate,
    exclude_weekends: bool,
}

impl Iterator for Days {
    type Item = CalendarDate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.next.filter(|date| *date <= self.end)?;
            self.next = current.next_day();

            if self.exclude_weekends && current.is_weekend() {
                continue;
            }
            return Some(current);
        }
    }
}

impl FusedIterator for Days {}

/// Build the candidate list for `start..=end`.
///
/// Fails with [`SamplingError::EmptyRange`] when no day survives the filter.
pub fn enumerate(
    start: CalendarDate,
    end: CalendarDate,
    exclude_weekends: bool,
) -> Result<CandidateSet, SamplingError> {
    CandidateSet::from_range(DateRange::new(start, end).excluding_weekends(exclude_weekends))
}

/// Ordered, duplicate-free dates eligible for sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSet {
    range: DateRange,
    dates: Vec<CalendarDate>,
}

impl CandidateSet {
    pub fn from_range(range: DateRange) -> Result<Self, SamplingError> {
        let dates = range.days().collect::<Vec<_>>();
        Self::non_empty(range, dates)
    }

    /// Copy without the given holidays; the original set is left untouched.
    pub fn without_holidays(&self, holidays: &HolidaySet) -> Result<Self, SamplingError> {
        let dates = self
            .dates
            .iter()
            .copied()
            .filter(|date| !holidays.contains(*date))
            .collect::<Vec<_>>();
        Self::non_empty(self.range, dates)
    }

    /// Holidays that are also candidates, in date order.
    pub fn holidays_within(&self, holidays: &HolidaySet) -> Vec<CalendarDate> {
        self.dates
            .iter()
            .copied()
            .filter(|date| holidays.contains(*date))
            .collect()
    }

    pub const fn range(&self) -> DateRange {
        self.range
    }

    pub fn as_slice(&self) -> &[CalendarDate] {
        &self.dates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CalendarDate> {
        self.dates.iter()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    pub fn into_vec(self) -> Vec<CalendarDate> {
        self.dates
    }

    fn non_empty(range: DateRange, dates: Vec<CalendarDate>) -> Result<Self, SamplingError> {
        if dates.is_empty() {
            return Err(SamplingError::EmptyRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(Self { range, dates })
    }
}

impl AsRef<[CalendarDate]> for CandidateSet {
    fn as_ref(&self) -> &[CalendarDate] {
        &self.dates
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a CalendarDate;
    type IntoIter = std::slice::Iter<'a, CalendarDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}
