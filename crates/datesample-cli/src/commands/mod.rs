mod candidates;
mod sample;

use std::sync::Arc;

use datesample_core::{
    CalendarDate, DateSampler, RawInput, ReqwestHttpClient, SamplerConfig, StaticHolidaySource,
};
use serde_json::Value;

use crate::cli::{Cli, Command, RangeArgs};
use crate::error::CliError;

/// Data and metadata produced by one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub data: Value,
    /// Dates for the text and csv renderers.
    pub dates: Vec<CalendarDate>,
    pub seed: Option<u32>,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn new(data: Value, dates: Vec<CalendarDate>) -> Self {
        Self {
            data,
            dates,
            seed: None,
            warnings: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = SamplerConfig::from_env()?;

    match &cli.command {
        Command::Sample(args) => {
            let sampler = build_sampler(config, &args.range)?;
            sample::run(args, &sampler).await
        }
        Command::Candidates(args) => {
            let sampler = build_sampler(config, args)?;
            candidates::run(args, &sampler).await
        }
    }
}

/// `--holiday` dates replace the configured provider.
fn build_sampler(config: SamplerConfig, args: &RangeArgs) -> Result<DateSampler, CliError> {
    if !args.holidays.is_empty() {
        let holidays = args
            .holidays
            .iter()
            .map(|value| {
                CalendarDate::parse(value).map_err(|_| {
                    CliError::InvalidArgument(format!(
                        "--holiday '{value}' is not a date, expected YYYY-MM-DD"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(DateSampler::new(config)
            .with_holiday_source(Arc::new(StaticHolidaySource::new(holidays))));
    }

    if args.exclude_holidays {
        return Ok(DateSampler::new(config).with_http_client(Arc::new(ReqwestHttpClient::new())));
    }

    Ok(DateSampler::new(config))
}

fn raw_input(args: &RangeArgs) -> RawInput {
    RawInput {
        start: args.start.clone(),
        end: args.end.clone(),
        exclude_weekends: args.exclude_weekends,
        exclude_holidays: args.exclude_holidays || !args.holidays.is_empty(),
        country: args.country.clone(),
        ..RawInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_args() -> RangeArgs {
        RangeArgs {
            start: Some("2021-01-01".to_owned()),
            end: Some("2021-01-10".to_owned()),
            exclude_weekends: false,
            exclude_holidays: false,
            country: None,
            holidays: Vec::new(),
        }
    }

    #[test]
    fn holiday_overrides_imply_exclusion() {
        let mut args = range_args();
        args.holidays = vec!["2021-01-01".to_owned()];
        assert!(raw_input(&args).exclude_holidays);
        assert!(!raw_input(&range_args()).exclude_holidays);
    }

    #[test]
    fn malformed_holiday_override_is_an_argument_error() {
        let mut args = range_args();
        args.holidays = vec!["01.01.2021".to_owned()];

        let err = build_sampler(SamplerConfig::default(), &args).expect_err("invalid date");
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 2);
    }
}
