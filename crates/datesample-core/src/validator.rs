//! Raw form input to [`SamplingRequest`] validation.
//!
//! Every independent check runs and all failures are reported together, in
//! check order. Checks that need an earlier value (the range checks need two
//! dates, the capacity check needs a range and a batch size) are skipped when
//! that value already failed.

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, CountryCode, DateRange, Field, FieldError, SamplingRequest, Seed,
    ValidationErrors, MAX_SEED,
};

const PROVIDE_DATE: &str = "Provide a date";
const PROVIDE_VALID_DATE: &str = "Provide a valid date (YYYY-MM-DD)";
const DEFINE_VALID_RANGE: &str = "Define a valid range";
const SAMPLE_WHOLE_NUMBER: &str = "Sample needs to be a whole number";
const SAMPLE_POSITIVE: &str = "Sample needs to be greater than 0";
const EXTEND_TIME_FRAME: &str = "Extend the time frame or pick a lower sample size";
const PROVIDE_SEED: &str = "Provide a seed number";
const SEED_WHOLE_NUMBER: &str = "Seed needs to be a whole number";
const SEED_POSITIVE: &str = "Seed needs to be greater than 0";
const SEED_TOO_LARGE: &str = "Seed needs to be smaller than 4294967295";
const PROVIDE_COUNTRY: &str = "Provide a two-letter country code";

/// Unvalidated user input, as typed into a form or passed on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub start: Option<String>,
    pub end: Option<String>,
    pub batch_size: Option<String>,
    pub exclude_weekends: bool,
    pub exclude_holidays: bool,
    pub country: Option<String>,
    pub seed: Option<String>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: impl Into<String>) -> Self {
        self.batch_size = Some(batch_size.into());
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn with_weekends_excluded(mut self, exclude: bool) -> Self {
        self.exclude_weekends = exclude;
        self
    }

    pub fn with_holidays_excluded(mut self, exclude: bool) -> Self {
        self.exclude_holidays = exclude;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(SamplingRequest),
    Invalid(ValidationErrors),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    pub fn into_result(self) -> Result<SamplingRequest, ValidationErrors> {
        match self {
            Self::Valid(request) => Ok(request),
            Self::Invalid(errors) => Err(errors),
        }
    }
}

/// Stateless validator; one instance can be shared across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputValidator {
    default_country: Option<CountryCode>,
}

impl InputValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Country used when holidays are excluded but no country was given.
    pub fn with_default_country(mut self, country: CountryCode) -> Self {
        self.default_country = Some(country);
        self
    }

    pub fn validate(&self, input: &RawInput) -> Validation {
        let mut errors = Vec::new();

        let range = check_range(input, &mut errors);
        let batch_size = check_batch_size(input.batch_size.as_deref(), &mut errors);

        if let (Some(range), Some(batch_size)) = (range, batch_size) {
            if range.len() < batch_size {
                errors.push(FieldError::new(
                    EXTEND_TIME_FRAME,
                    [
                        Field::StartDate,
                        Field::EndDate,
                        Field::BatchSize,
                        Field::ExcludeWeekends,
                    ],
                ));
            }
        }

        let seed = check_seed(input.seed.as_deref(), &mut errors);
        let country = self.check_country(input, &mut errors);

        match (range, batch_size, seed, country) {
            (Some(range), Some(batch_size), Some(seed), Some(country)) if errors.is_empty() => {
                Validation::Valid(SamplingRequest {
                    start: range.start(),
                    end: range.end(),
                    batch_size,
                    exclude_weekends: input.exclude_weekends,
                    holiday_country: country,
                    seed,
                })
            }
            _ => {
                tracing::debug!(errors = errors.len(), "input rejected");
                Validation::Invalid(ValidationErrors::new(errors))
            }
        }
    }

    /// Check only the dates, the weekend flag and the holiday country.
    ///
    /// Used when listing candidates, where no batch size or seed is involved.
    pub fn validate_range(
        &self,
        input: &RawInput,
    ) -> Result<(DateRange, Option<CountryCode>), ValidationErrors> {
        let mut errors = Vec::new();
        let range = check_range(input, &mut errors);
        let country = self.check_country(input, &mut errors);

        match (range, country) {
            (Some(range), Some(country)) if errors.is_empty() => Ok((range, country)),
            _ => Err(ValidationErrors::new(errors)),
        }
    }

    // Outer `None` means the check failed; inner `None` means holidays stay.
    fn check_country(
        &self,
        input: &RawInput,
        errors: &mut Vec<FieldError>,
    ) -> Option<Option<CountryCode>> {
        if !input.exclude_holidays {
            return Some(None);
        }

        let parsed = match non_blank(input.country.as_deref()) {
            Some(raw) => CountryCode::parse(raw).ok(),
            None => self.default_country.clone(),
        };
        match parsed {
            Some(country) => Some(Some(country)),
            None => {
                errors.push(FieldError::single(PROVIDE_COUNTRY, Field::ExcludeHolidays));
                None
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn check_range(input: &RawInput, errors: &mut Vec<FieldError>) -> Option<DateRange> {
    let start = check_date(input.start.as_deref(), Field::StartDate, errors);
    let end = check_date(input.end.as_deref(), Field::EndDate, errors);

    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            errors.push(FieldError::new(
                format!("{end} needs to be greater than {start}"),
                [Field::StartDate, Field::EndDate],
            ));
            None
        }
        (Some(start), Some(end)) if start == end => {
            errors.push(FieldError::new(
                DEFINE_VALID_RANGE,
                [Field::StartDate, Field::EndDate],
            ));
            None
        }
        (Some(start), Some(end)) => {
            Some(DateRange::new(start, end).excluding_weekends(input.exclude_weekends))
        }
        _ => None,
    }
}

fn check_date(
    value: Option<&str>,
    field: Field,
    errors: &mut Vec<FieldError>,
) -> Option<CalendarDate> {
    let Some(raw) = non_blank(value) else {
        errors.push(FieldError::single(PROVIDE_DATE, field));
        return None;
    };
    match CalendarDate::parse(raw) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::single(PROVIDE_VALID_DATE, field));
            None
        }
    }
}

fn check_batch_size(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<usize> {
    let parsed = match non_blank(value).map(str::parse::<i64>) {
        Some(Ok(parsed)) => Ok(parsed),
        // Too large to fit is still a whole number; the capacity check rejects it.
        Some(Err(e)) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Some(Err(e)) if *e.kind() == IntErrorKind::NegOverflow => Ok(i64::MIN),
        _ => Err(SAMPLE_WHOLE_NUMBER),
    };

    match parsed {
        Ok(size) if size <= 0 => {
            errors.push(FieldError::single(SAMPLE_POSITIVE, Field::BatchSize));
            None
        }
        Ok(size) => Some(usize::try_from(size).unwrap_or(usize::MAX)),
        Err(message) => {
            errors.push(FieldError::single(message, Field::BatchSize));
            None
        }
    }
}

fn check_seed(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<Seed> {
    let Some(raw) = non_blank(value) else {
        errors.push(FieldError::single(PROVIDE_SEED, Field::Seed));
        return None;
    };

    let message = match raw.parse::<i64>() {
        Ok(seed) if seed <= 0 => SEED_POSITIVE,
        Ok(seed) if seed > MAX_SEED => SEED_TOO_LARGE,
        Ok(seed) => match Seed::new(seed) {
            Ok(seed) => return Some(seed),
            Err(_) => SEED_WHOLE_NUMBER,
        },
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => SEED_TOO_LARGE,
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => SEED_POSITIVE,
        Err(_) => SEED_WHOLE_NUMBER,
    };
    errors.push(FieldError::single(message, Field::Seed));
    None
}
