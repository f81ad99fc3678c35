use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::holidays::HolidayLookupError;
use crate::CalendarDate;

/// Raw input field, ordered as the sampling form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum Field {
    StartDate,
    EndDate,
    BatchSize,
    ExcludeWeekends,
    ExcludeHolidays,
    Seed,
}

impl Field {
    pub const ALL: [Self; 6] = [
        Self::StartDate,
        Self::EndDate,
        Self::BatchSize,
        Self::ExcludeWeekends,
        Self::ExcludeHolidays,
        Self::Seed,
    ];

    pub const fn index(self) -> usize {
        match self {
            Self::StartDate => 0,
            Self::EndDate => 1,
            Self::BatchSize => 2,
            Self::ExcludeWeekends => 3,
            Self::ExcludeHolidays => 4,
            Self::Seed => 5,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::BatchSize => "batch_size",
            Self::ExcludeWeekends => "exclude_weekends",
            Self::ExcludeHolidays => "exclude_holidays",
            Self::Seed => "seed",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<usize> for Field {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_index(value).ok_or_else(|| format!("unknown field index {value}"))
    }
}

impl From<Field> for usize {
    fn from(value: Field) -> Self {
        value.index()
    }
}

/// One violated input rule and the fields it should be displayed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    message: String,
    fields: BTreeSet<Field>,
}

impl FieldError {
    pub fn new(message: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            message: message.into(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn single(message: impl Into<String>, field: Field) -> Self {
        Self::new(message, [field])
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &BTreeSet<Field> {
        &self.fields
    }

    pub fn field_indices(&self) -> Vec<usize> {
        self.fields.iter().map(|field| field.index()).collect()
    }

    pub fn affects(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub const fn code(&self) -> &'static str {
        "validation.field"
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (fields {:?})", self.message, self.field_indices())
    }
}

impl std::error::Error for FieldError {}

/// Every field error collected in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages to show next to `field`, in check order.
    pub fn messages_for(&self, field: Field) -> Vec<&str> {
        self.0
            .iter()
            .filter(|error| error.affects(field))
            .map(FieldError::message)
            .collect()
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} invalid input(s)", self.0.len())?;
        for (index, error) in self.0.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{}", error.message())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Failures of the enumeration and sampling stages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SamplingError {
    #[error("'{value}' is not a calendar date, expected YYYY-MM-DD")]
    DateType { value: String },

    #[error("start {start} must be before end {end}")]
    InvalidRange {
        start: CalendarDate,
        end: CalendarDate,
    },

    #[error("no candidate dates between {start} and {end}")]
    EmptyRange {
        start: CalendarDate,
        end: CalendarDate,
    },

    #[error("batch size must be greater than zero")]
    InvalidBatchSize,

    #[error("requested {requested} dates but only {available} candidates are available")]
    InsufficientRange { requested: usize, available: usize },

    #[error("draw budget of {draws} exhausted after accepting {accepted} of {requested} dates")]
    DrawLimitReached {
        requested: usize,
        accepted: usize,
        draws: usize,
    },

    #[error("seed {seed} is outside 1..=4294967295")]
    InvalidSeed { seed: i64 },
}

impl SamplingError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DateType { .. } => "sampling.date_type",
            Self::InvalidRange { .. } => "sampling.invalid_range",
            Self::EmptyRange { .. } => "sampling.empty_range",
            Self::InvalidBatchSize => "sampling.invalid_batch_size",
            Self::InsufficientRange { .. } | Self::DrawLimitReached { .. } => {
                "sampling.insufficient_range"
            }
            Self::InvalidSeed { .. } => "sampling.invalid_seed",
        }
    }

    /// True when the candidate pool could not satisfy the batch size.
    pub const fn is_insufficient_range(&self) -> bool {
        matches!(
            self,
            Self::InsufficientRange { .. } | Self::DrawLimitReached { .. }
        )
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    HolidayLookup(#[from] HolidayLookupError),
}

impl CoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation.field",
            Self::Sampling(error) => error.code(),
            Self::HolidayLookup(error) => error.code(),
        }
    }
}
