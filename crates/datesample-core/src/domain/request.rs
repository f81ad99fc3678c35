use serde::{Deserialize, Serialize};

use crate::{CalendarDate, CountryCode, DateRange, SamplingError, Seed};

/// Fully validated sampling request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields")]
pub struct SamplingRequest {
    pub start: CalendarDate,
    pub end: CalendarDate,
    pub batch_size: usize,
    pub exclude_weekends: bool,
    /// Holiday calendar to exclude; `None` keeps holidays in the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_country: Option<CountryCode>,
    pub seed: Seed,
}

/// Wire shape of a request before the range and batch checks run.
#[derive(Deserialize)]
struct RequestFields {
    start: CalendarDate,
    end: CalendarDate,
    batch_size: usize,
    #[serde(default)]
    exclude_weekends: bool,
    #[serde(default)]
    holiday_country: Option<CountryCode>,
    seed: Seed,
}

impl TryFrom<RequestFields> for SamplingRequest {
    type Error = SamplingError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        let request = Self::new(fields.start, fields.end, fields.batch_size, fields.seed)?
            .with_weekends_excluded(fields.exclude_weekends);
        Ok(match fields.holiday_country {
            Some(country) => request.with_holidays_excluded(country),
            None => request,
        })
    }
}

impl SamplingRequest {
    pub fn new(
        start: CalendarDate,
        end: CalendarDate,
        batch_size: usize,
        seed: Seed,
    ) -> Result<Self, SamplingError> {
        if start >= end {
            return Err(SamplingError::InvalidRange { start, end });
        }
        if batch_size == 0 {
            return Err(SamplingError::InvalidBatchSize);
        }

        Ok(Self {
            start,
            end,
            batch_size,
            exclude_weekends: false,
            holiday_country: None,
            seed,
        })
    }

    pub fn with_weekends_excluded(mut self, exclude: bool) -> Self {
        self.exclude_weekends = exclude;
        self
    }

    pub fn with_holidays_excluded(mut self, country: CountryCode) -> Self {
        self.holiday_country = Some(country);
        self
    }

    pub fn exclude_holidays(&self) -> bool {
        self.holiday_country.is_some()
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end).excluding_weekends(self.exclude_weekends)
    }
}
