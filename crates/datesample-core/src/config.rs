//! Runtime configuration for sampling and holiday lookup.
//!
//! Defaults work offline-first except for the holiday provider, which is only
//! contacted when a request asks for holidays to be excluded. Every value can
//! be overridden from `DATESAMPLE_*` environment variables.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::holidays::HolidayProviderId;
use crate::sampler::DEFAULT_MAX_DRAWS_PER_CANDIDATE;
use crate::CountryCode;

pub const ENV_MAX_DRAWS_PER_CANDIDATE: &str = "DATESAMPLE_MAX_DRAWS_PER_CANDIDATE";
pub const ENV_HOLIDAY_PROVIDER: &str = "DATESAMPLE_HOLIDAY_PROVIDER";
pub const ENV_HOLIDAY_COUNTRY: &str = "DATESAMPLE_HOLIDAY_COUNTRY";
pub const ENV_HOLIDAY_LANGUAGE: &str = "DATESAMPLE_HOLIDAY_LANGUAGE";
pub const ENV_HOLIDAY_TIMEOUT_MS: &str = "DATESAMPLE_HOLIDAY_TIMEOUT_MS";
pub const ENV_HOLIDAY_ON_FAILURE: &str = "DATESAMPLE_HOLIDAY_ON_FAILURE";

/// Invalid configuration value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// What to do when the holiday collaborator fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayFailurePolicy {
    /// Surface the lookup error; no batch is produced.
    #[default]
    Fail,
    /// Sample without the holiday filter and attach a warning.
    SkipFiltering,
}

impl HolidayFailurePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Some(Self::Fail),
            "skip" | "skip_filtering" => Some(Self::SkipFiltering),
            _ => None,
        }
    }
}

/// Holiday collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayConfig {
    pub provider: HolidayProviderId,
    pub default_country: CountryCode,
    pub language: String,
    pub timeout_ms: u64,
    pub on_failure: HolidayFailurePolicy,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            provider: HolidayProviderId::OpenHolidays,
            default_country: CountryCode::luxembourg(),
            language: String::from("EN"),
            timeout_ms: 3_000,
            on_failure: HolidayFailurePolicy::Fail,
        }
    }
}

impl HolidayConfig {
    pub fn with_provider(mut self, provider: HolidayProviderId) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_default_country(mut self, country: CountryCode) -> Self {
        self.default_country = country;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// A zero timeout is raised to 1 ms.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: HolidayFailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }
}

/// Top-level configuration consumed by [`crate::DateSampler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub max_draws_per_candidate: u32,
    pub holiday: HolidayConfig,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_draws_per_candidate: DEFAULT_MAX_DRAWS_PER_CANDIDATE,
            holiday: HolidayConfig::default(),
        }
    }
}

impl SamplerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unset or blank keys keep their value.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(ENV_MAX_DRAWS_PER_CANDIDATE) {
            self.max_draws_per_candidate = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|parsed| *parsed > 0)
                .ok_or_else(|| invalid(ENV_MAX_DRAWS_PER_CANDIDATE, &value, "a positive integer"))?;
        }
        if let Some(value) = read(ENV_HOLIDAY_PROVIDER) {
            // Static dates cannot come from the environment.
            self.holiday.provider = value
                .parse::<HolidayProviderId>()
                .ok()
                .filter(|provider| *provider != HolidayProviderId::Static)
                .ok_or_else(|| invalid(ENV_HOLIDAY_PROVIDER, &value, "openholidays or nager"))?;
        }
        if let Some(value) = read(ENV_HOLIDAY_COUNTRY) {
            self.holiday.default_country = CountryCode::parse(&value)
                .map_err(|_| invalid(ENV_HOLIDAY_COUNTRY, &value, "a two-letter country code"))?;
        }
        if let Some(value) = read(ENV_HOLIDAY_LANGUAGE) {
            self.holiday.language = value.trim().to_ascii_uppercase();
        }
        if let Some(value) = read(ENV_HOLIDAY_TIMEOUT_MS) {
            self.holiday.timeout_ms = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|parsed| *parsed > 0)
                .ok_or_else(|| invalid(ENV_HOLIDAY_TIMEOUT_MS, &value, "milliseconds greater than 0"))?;
        }
        if let Some(value) = read(ENV_HOLIDAY_ON_FAILURE) {
            self.holiday.on_failure = HolidayFailurePolicy::parse(&value)
                .ok_or_else(|| invalid(ENV_HOLIDAY_ON_FAILURE, &value, "fail or skip"))?;
        }

        Ok(self)
    }

    pub fn with_max_draws_per_candidate(mut self, max_draws: u32) -> Self {
        self.max_draws_per_candidate = max_draws;
        self
    }

    pub fn with_holiday(mut self, holiday: HolidayConfig) -> Self {
        self.holiday = holiday;
        self
    }
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
        expected,
    }
}
