use datesample_core::{
    ConfigError, CoreError, HolidayLookupError, SamplingError, ValidationErrors,
};
use thiserror::Error;

use crate::envelope::EnvelopeError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    HolidayLookup(#[from] HolidayLookupError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(errors) => Self::Validation(errors),
            CoreError::Sampling(error) => Self::Sampling(error),
            CoreError::HolidayLookup(error) => Self::HolidayLookup(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::InvalidArgument(_) | Self::Config(_) => 2,
            Self::Sampling(_) => 3,
            Self::HolidayLookup(_) => 4,
            Self::Serialization(_) | Self::Timestamp(_) => 5,
            Self::Io(_) => 10,
        }
    }

    /// Structured envelope errors; one per field error for validation failures.
    pub fn envelope_errors(&self) -> Vec<EnvelopeError> {
        match self {
            Self::Validation(errors) => errors
                .iter()
                .map(|error| {
                    EnvelopeError::new(error.code(), error.message())
                        .with_fields(error.field_indices())
                })
                .collect(),
            Self::InvalidArgument(message) => {
                vec![EnvelopeError::new("cli.invalid_argument", message.clone())]
            }
            Self::Config(error) => vec![EnvelopeError::new("config.invalid", error.to_string())],
            Self::Sampling(error) => vec![EnvelopeError::new(error.code(), error.to_string())],
            Self::HolidayLookup(error) => vec![EnvelopeError::new(error.code(), error.message())
                .with_retryable(error.retryable())],
            Self::Serialization(error) => vec![EnvelopeError::new("serialization", error.to_string())],
            Self::Timestamp(error) => vec![EnvelopeError::new("serialization", error.to_string())],
            Self::Io(error) => vec![EnvelopeError::new("io", error.to_string())],
        }
    }
}
