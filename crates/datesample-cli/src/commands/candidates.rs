use datesample_core::DateSampler;
use serde_json::json;

use super::{raw_input, CommandResult};
use crate::cli::RangeArgs;
use crate::error::CliError;

pub async fn run(args: &RangeArgs, sampler: &DateSampler) -> Result<CommandResult, CliError> {
    let input = raw_input(args);
    let (range, country) = sampler.validator().validate_range(&input)?;

    let filtered = sampler.candidates_in(range, country.as_ref()).await?;
    let dates = filtered.candidates.as_slice().to_vec();

    let data = json!({
        "dates": dates,
        "count": dates.len(),
        "holidays_applied": filtered.holidays_applied,
        "holidays_removed": filtered.holidays_removed,
    });

    Ok(CommandResult::new(data, dates).with_warnings(filtered.warnings))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use datesample_core::{CalendarDate, SamplerConfig, StaticHolidaySource};

    use super::*;

    #[tokio::test]
    async fn lists_weekdays_without_holidays() {
        let args = RangeArgs {
            start: Some("2021-12-20".to_owned()),
            end: Some("2021-12-31".to_owned()),
            exclude_weekends: true,
            exclude_holidays: true,
            country: Some("LU".to_owned()),
            holidays: Vec::new(),
        };
        let holidays = ["2021-12-25", "2021-12-26", "2021-12-24"]
            .map(|value| CalendarDate::parse(value).expect("valid date"));
        let sampler = DateSampler::new(SamplerConfig::default())
            .with_holiday_source(Arc::new(StaticHolidaySource::new(holidays)));

        let result = run(&args, &sampler).await.expect("candidates");

        // 20-31 Dec 2021 has ten weekdays; Friday the 24th is the only weekday holiday.
        assert_eq!(result.data["count"], json!(9));
        assert_eq!(result.data["holidays_removed"], json!(["2021-12-24"]));
        assert_eq!(result.seed, None);
    }

    #[tokio::test]
    async fn reversed_range_is_rejected() {
        let args = RangeArgs {
            start: Some("2021-02-01".to_owned()),
            end: Some("2021-01-01".to_owned()),
            exclude_weekends: false,
            exclude_holidays: false,
            country: None,
            holidays: Vec::new(),
        };
        let err = run(&args, &DateSampler::new(SamplerConfig::default()))
            .await
            .expect_err("reversed");
        assert_eq!(err.exit_code(), 2);
    }
}
