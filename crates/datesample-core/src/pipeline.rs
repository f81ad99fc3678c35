//! End-to-end sampling: validation, enumeration, holiday filter, draw.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::holidays::{source_for, HolidayLookupError, HolidayQuery, HolidaySource};
use crate::http_client::HttpClient;
use crate::{
    CalendarDate, CandidateSet, CoreError, CountryCode, DateRange, HolidayFailurePolicy,
    InputValidator, Prng, RawInput, SampleBatch, Sampler, SamplerConfig, SamplingRequest,
    Validation,
};

/// Candidate list after every requested filter was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredCandidates {
    pub candidates: CandidateSet,
    /// Candidates dropped because they are public holidays.
    pub holidays_removed: Vec<CalendarDate>,
    /// False when holidays were requested but the lookup was skipped.
    pub holidays_applied: bool,
    pub warnings: Vec<String>,
}

/// Result of one successful sampling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplingOutcome {
    pub request: SamplingRequest,
    pub batch: SampleBatch,
    pub candidate_count: usize,
    pub holidays_removed: Vec<CalendarDate>,
    pub holidays_applied: bool,
    pub warnings: Vec<String>,
}

impl SamplingOutcome {
    pub fn dates(&self) -> &[CalendarDate] {
        self.batch.dates()
    }
}

/// Sampling service combining the core components with an optional holiday source.
#[derive(Clone)]
pub struct DateSampler {
    config: SamplerConfig,
    holidays: Option<Arc<dyn HolidaySource>>,
}

impl DateSampler {
    /// Sampler without a holiday source; requests that exclude holidays fail
    /// (or skip filtering, depending on the configured policy).
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            holidays: None,
        }
    }

    pub fn with_holiday_source(mut self, source: Arc<dyn HolidaySource>) -> Self {
        self.holidays = Some(source);
        self
    }

    /// Use the configured HTTP provider on top of `http_client`.
    pub fn with_http_client(self, http_client: Arc<dyn HttpClient>) -> Self {
        let source = source_for(&self.config.holiday, http_client);
        self.with_holiday_source(source)
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn validator(&self) -> InputValidator {
        InputValidator::new().with_default_country(self.config.holiday.default_country.clone())
    }

    pub fn validate(&self, input: &RawInput) -> Validation {
        self.validator().validate(input)
    }

    pub async fn sample(&self, input: &RawInput) -> Result<SamplingOutcome, CoreError> {
        let request = self.validate(input).into_result()?;
        self.sample_request(&request).await
    }

    pub async fn sample_request(
        &self,
        request: &SamplingRequest,
    ) -> Result<SamplingOutcome, CoreError> {
        let filtered = self.candidates(request).await?;

        let mut prng = Prng::new(request.seed);
        let batch = Sampler::from_config(&self.config).draw(
            filtered.candidates.as_slice(),
            request.batch_size,
            &mut prng,
        )?;

        tracing::debug!(
            seed = request.seed.get(),
            candidates = filtered.candidates.len(),
            draws = batch.draws(),
            "sampling run complete"
        );

        Ok(SamplingOutcome {
            request: request.clone(),
            candidate_count: filtered.candidates.len(),
            batch,
            holidays_removed: filtered.holidays_removed,
            holidays_applied: filtered.holidays_applied,
            warnings: filtered.warnings,
        })
    }

    pub async fn candidates(
        &self,
        request: &SamplingRequest,
    ) -> Result<FilteredCandidates, CoreError> {
        self.candidates_in(request.range(), request.holiday_country.as_ref())
            .await
    }

    /// Enumerate `range` and, when `holiday_country` is set, drop its holidays.
    pub async fn candidates_in(
        &self,
        range: DateRange,
        holiday_country: Option<&CountryCode>,
    ) -> Result<FilteredCandidates, CoreError> {
        let candidates = CandidateSet::from_range(range)?;
        tracing::debug!(
            start = %range.start(),
            end = %range.end(),
            candidates = candidates.len(),
            "candidates enumerated"
        );

        let Some(country) = holiday_country else {
            return Ok(FilteredCandidates {
                candidates,
                holidays_removed: Vec::new(),
                holidays_applied: false,
                warnings: Vec::new(),
            });
        };

        match self.lookup_holidays(country, range).await {
            Ok(holidays) => {
                let removed = candidates.holidays_within(&holidays);
                let filtered = candidates.without_holidays(&holidays)?;
                tracing::debug!(
                    country = country.as_str(),
                    removed = removed.len(),
                    "holiday filter applied"
                );
                Ok(FilteredCandidates {
                    candidates: filtered,
                    holidays_removed: removed,
                    holidays_applied: true,
                    warnings: Vec::new(),
                })
            }
            Err(error) => match self.config.holiday.on_failure {
                HolidayFailurePolicy::Fail => Err(error.into()),
                HolidayFailurePolicy::SkipFiltering => {
                    tracing::warn!(
                        country = country.as_str(),
                        code = error.code(),
                        error = %error,
                        "holiday lookup failed, sampling without holiday filter"
                    );
                    Ok(FilteredCandidates {
                        candidates,
                        holidays_removed: Vec::new(),
                        holidays_applied: false,
                        warnings: vec![format!(
                            "holidays for {country} were not excluded: {}",
                            error.message()
                        )],
                    })
                }
            },
        }
    }

    async fn lookup_holidays(
        &self,
        country: &CountryCode,
        range: DateRange,
    ) -> Result<crate::HolidaySet, HolidayLookupError> {
        let source = self
            .holidays
            .as_ref()
            .ok_or_else(|| HolidayLookupError::unavailable("no holiday source configured"))?;
        let query = HolidayQuery::new(country.clone(), range.start(), range.end())?;

        // Per-year providers issue one request per year, each with its own deadline.
        let years = query.years().count().max(1) as u64;
        let budget_ms = self.config.holiday.timeout_ms.saturating_mul(years);

        match tokio::time::timeout(Duration::from_millis(budget_ms), source.holidays(query)).await
        {
            Ok(result) => result,
            Err(_) => Err(HolidayLookupError::timeout(budget_ms)),
        }
    }
}

impl fmt::Debug for DateSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateSampler")
            .field("config", &self.config)
            .field(
                "holiday_source",
                &self.holidays.as_ref().map(|source| source.id()),
            )
            .finish()
    }
}

impl Default for DateSampler {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use super::*;
    use crate::holidays::{HolidayLookupErrorKind, HolidayProviderId, HolidaySet, StaticHolidaySource};
    use crate::SamplingError;

    fn date(value: &str) -> CalendarDate {
        CalendarDate::parse(value).expect("valid date")
    }

    fn reference_input() -> RawInput {
        RawInput::new()
            .with_start("2021-01-01")
            .with_end("2021-01-10")
            .with_batch_size("5")
            .with_seed("111")
    }

    struct FailingSource;

    impl HolidaySource for FailingSource {
        fn id(&self) -> HolidayProviderId {
            HolidayProviderId::OpenHolidays
        }

        fn holidays<'a>(
            &'a self,
            _query: HolidayQuery,
        ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>>
        {
            Box::pin(async move { Err(HolidayLookupError::upstream_status(self.id(), 502)) })
        }
    }

    struct StalledSource;

    impl HolidaySource for StalledSource {
        fn id(&self) -> HolidayProviderId {
            HolidayProviderId::NagerDate
        }

        fn holidays<'a>(
            &'a self,
            _query: HolidayQuery,
        ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>>
        {
            Box::pin(std::future::pending())
        }
    }

    #[tokio::test]
    async fn reference_run_is_reproducible() {
        let sampler = DateSampler::default();
        let first = sampler.sample(&reference_input()).await.expect("outcome");
        let second = sampler.sample(&reference_input()).await.expect("outcome");

        let expected = ["2021-01-01", "2021-01-02", "2021-01-05", "2021-01-08", "2021-01-10"]
            .map(date);
        assert_eq!(first.dates(), expected.as_slice());
        assert_eq!(first, second);
        assert_eq!(first.candidate_count, 10);
        assert!(!first.holidays_applied);
    }

    #[tokio::test]
    async fn invalid_input_is_a_validation_error() {
        let err = DateSampler::default()
            .sample(&reference_input().with_seed("0"))
            .await
            .expect_err("invalid");
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.code(), "validation.field");
    }

    #[tokio::test]
    async fn holidays_are_removed_before_drawing() {
        let sampler = DateSampler::default().with_holiday_source(Arc::new(
            StaticHolidaySource::new([date("2021-01-01"), date("2021-02-01")]),
        ));
        let input = reference_input()
            .with_batch_size("9")
            .with_holidays_excluded(true);

        let outcome = sampler.sample(&input).await.expect("outcome");
        assert!(outcome.holidays_applied);
        assert_eq!(outcome.holidays_removed, vec![date("2021-01-01")]);
        assert_eq!(outcome.candidate_count, 9);
        assert!(!outcome.dates().contains(&date("2021-01-01")));
    }

    #[tokio::test]
    async fn holidays_can_shrink_the_pool_below_the_batch() {
        let sampler = DateSampler::default().with_holiday_source(Arc::new(
            StaticHolidaySource::new([date("2021-01-04")]),
        ));
        let input = reference_input()
            .with_batch_size("10")
            .with_holidays_excluded(true);

        let err = sampler.sample(&input).await.expect_err("pool too small");
        assert!(matches!(
            err,
            CoreError::Sampling(SamplingError::InsufficientRange {
                requested: 10,
                available: 9
            })
        ));
    }

    #[tokio::test]
    async fn lookup_failure_fails_by_default() {
        let sampler = DateSampler::default().with_holiday_source(Arc::new(FailingSource));
        let err = sampler
            .sample(&reference_input().with_holidays_excluded(true))
            .await
            .expect_err("lookup failure");
        assert_eq!(err.code(), "holiday.upstream_status");
    }

    #[tokio::test]
    async fn lookup_failure_can_fall_back_with_a_warning() {
        let config = SamplerConfig::default().with_holiday(
            crate::HolidayConfig::default().with_failure_policy(HolidayFailurePolicy::SkipFiltering),
        );
        let sampler = DateSampler::new(config).with_holiday_source(Arc::new(FailingSource));

        let outcome = sampler
            .sample(&reference_input().with_holidays_excluded(true))
            .await
            .expect("fallback outcome");
        assert!(!outcome.holidays_applied);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("LU"));
        assert_eq!(outcome.candidate_count, 10);
    }

    #[tokio::test]
    async fn missing_source_is_unavailable() {
        let err = DateSampler::default()
            .sample(&reference_input().with_holidays_excluded(true))
            .await
            .expect_err("no source");
        match err {
            CoreError::HolidayLookup(error) => {
                assert_eq!(error.kind(), HolidayLookupErrorKind::Unavailable)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn configured_static_provider_never_passes_holidays_through() {
        let config = SamplerConfig::default()
            .with_holiday(crate::HolidayConfig::default().with_provider(HolidayProviderId::Static));
        let sampler = DateSampler::new(config.clone()).with_http_client(Arc::new(
            crate::holidays::test_support::RecordingHttpClient::default(),
        ));
        let input = reference_input()
            .with_batch_size("10")
            .with_holidays_excluded(true);

        let err = sampler.sample(&input).await.expect_err("no dates to exclude");
        assert_eq!(err.code(), "holiday.unavailable");

        let skipping = DateSampler::new(config.with_holiday(
            crate::HolidayConfig::default()
                .with_provider(HolidayProviderId::Static)
                .with_failure_policy(HolidayFailurePolicy::SkipFiltering),
        ))
        .with_http_client(Arc::new(
            crate::holidays::test_support::RecordingHttpClient::default(),
        ));
        let outcome = skipping.sample(&input).await.expect("fallback outcome");
        assert!(!outcome.holidays_applied);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn debug_names_the_holiday_source() {
        let sampler = DateSampler::default()
            .with_holiday_source(Arc::new(StaticHolidaySource::new([date("2021-01-01")])));
        let rendered = format!("{sampler:?}");
        assert!(rendered.contains("holiday_source: Some(Static)"));
        assert!(format!("{:?}", DateSampler::default()).contains("holiday_source: None"));
    }

    #[tokio::test]
    async fn stalled_lookup_times_out() {
        let config = SamplerConfig::default()
            .with_holiday(crate::HolidayConfig::default().with_timeout_ms(50));
        let sampler = DateSampler::new(config).with_holiday_source(Arc::new(StalledSource));

        let err = sampler
            .sample(&reference_input().with_holidays_excluded(true))
            .await
            .expect_err("timeout");
        assert_eq!(err.code(), "holiday.timeout");
    }

    #[tokio::test]
    async fn candidates_without_holidays_list_every_weekday() {
        let range = DateRange::new(date("2021-01-01"), date("2021-01-31")).excluding_weekends(true);
        let filtered = DateSampler::default()
            .candidates_in(range, None)
            .await
            .expect("candidates");
        assert_eq!(filtered.candidates.len(), 21);
        assert!(filtered.warnings.is_empty());
    }
}
