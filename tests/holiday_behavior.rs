//! Behavior tests for holiday exclusion.
//!
//! Holiday providers are exercised through a canned HTTP transport, so these
//! tests never reach the network.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use datesample_core::{
    CalendarDate, CoreError, DateSampler, HolidayConfig, HolidayFailurePolicy,
    HolidayLookupErrorKind, HolidayProviderId, HttpClient, HttpError, HttpErrorKind, HttpRequest,
    HttpResponse, RawInput, SamplerConfig, SamplingError, StaticHolidaySource,
};

#[derive(Default)]
struct CannedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    urls: Mutex<Vec<String>>,
}

impl CannedHttpClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("url log").clone()
    }
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.urls.lock().expect("url log").push(request.url);
        let response = self
            .responses
            .lock()
            .expect("response queue")
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::ok_json("[]")));
        Box::pin(async move { response })
    }
}

fn date(value: &str) -> CalendarDate {
    CalendarDate::parse(value).expect("valid date")
}

fn dates(values: &[&str]) -> Vec<CalendarDate> {
    values.iter().map(|value| date(value)).collect()
}

fn christmas_input() -> RawInput {
    RawInput::new()
        .with_start("2021-12-20")
        .with_end("2021-12-31")
        .with_batch_size("3")
        .with_seed("111")
        .with_weekends_excluded(true)
        .with_holidays_excluded(true)
}

fn config(provider: HolidayProviderId) -> SamplerConfig {
    SamplerConfig::default().with_holiday(HolidayConfig::default().with_provider(provider))
}

// =============================================================================
// Holidays: Provider Lookups
// =============================================================================

#[tokio::test]
async fn when_openholidays_lists_christmas_system_samples_around_it() {
    // Given: OpenHolidays reports Christmas Eve through St Stephen's Day
    let client = CannedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        r#"[{"id":"x","startDate":"2021-12-24","endDate":"2021-12-26","type":"Public"}]"#,
    ))]);
    let sampler = DateSampler::new(config(HolidayProviderId::OpenHolidays))
        .with_http_client(client.clone());

    // When: Weekdays without Luxembourg holidays are sampled
    let outcome = sampler.sample(&christmas_input()).await.expect("outcome");

    // Then: The only weekday holiday is removed before drawing
    assert!(outcome.holidays_applied);
    assert_eq!(outcome.holidays_removed, dates(&["2021-12-24"]));
    assert_eq!(outcome.candidate_count, 9);
    assert_eq!(
        outcome.dates(),
        dates(&["2021-12-20", "2021-12-23", "2021-12-29"]).as_slice()
    );

    // And: One range query was sent for the default country
    let urls = client.urls();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].contains("countryIsoCode=LU"));
    assert!(urls[0].contains("validFrom=2021-12-20&validTo=2021-12-31"));
}

#[tokio::test]
async fn when_nager_is_configured_system_queries_each_year() {
    // Given: A range crossing New Year and the Nager.Date provider
    let client = CannedHttpClient::new(vec![
        Ok(HttpResponse::ok_json(r#"[{"date":"2021-12-25"},{"date":"2021-12-26"}]"#)),
        Ok(HttpResponse::ok_json(r#"[{"date":"2022-01-01"}]"#)),
    ]);
    let sampler =
        DateSampler::new(config(HolidayProviderId::NagerDate)).with_http_client(client.clone());
    let input = RawInput::new()
        .with_start("2021-12-24")
        .with_end("2022-01-02")
        .with_batch_size("7")
        .with_seed("9")
        .with_holidays_excluded(true)
        .with_country("de");

    // When: The range is sampled with holidays excluded
    let outcome = sampler.sample(&input).await.expect("outcome");

    // Then: Every non-holiday day is drawn
    assert_eq!(
        outcome.dates(),
        dates(&[
            "2021-12-24", "2021-12-27", "2021-12-28", "2021-12-29", "2021-12-30", "2021-12-31",
            "2022-01-02",
        ])
        .as_slice()
    );
    assert_eq!(
        client.urls(),
        vec![
            "https://date.nager.at/api/v3/PublicHolidays/2021/DE".to_owned(),
            "https://date.nager.at/api/v3/PublicHolidays/2022/DE".to_owned(),
        ]
    );
}

#[tokio::test]
async fn when_holidays_are_not_requested_system_never_calls_provider() {
    // Given: A provider that would fail every call
    let client = CannedHttpClient::new(vec![Err(HttpError::new(
        HttpErrorKind::Connect,
        "refused",
    ))]);
    let sampler = DateSampler::default().with_http_client(client.clone());

    // When: Holidays stay in the pool
    let input = christmas_input().with_holidays_excluded(false);
    let outcome = sampler.sample(&input).await.expect("outcome");

    // Then: No request was made
    assert!(client.urls().is_empty());
    assert_eq!(outcome.candidate_count, 10);
}

// =============================================================================
// Holidays: Failure Policy
// =============================================================================

#[tokio::test]
async fn when_provider_is_down_system_fails_by_default() {
    // Given: A transport timeout
    let client = CannedHttpClient::new(vec![Err(HttpError::new(
        HttpErrorKind::Timeout,
        "deadline elapsed",
    ))]);
    let sampler = DateSampler::default().with_http_client(client);

    // When: Holidays are requested
    let err = sampler
        .sample(&christmas_input())
        .await
        .expect_err("lookup fails");

    // Then: The error is a holiday lookup error, not a sampling error
    match err {
        CoreError::HolidayLookup(error) => {
            assert_eq!(error.kind(), HolidayLookupErrorKind::Timeout);
            assert!(error.retryable());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn when_skip_policy_is_set_system_samples_without_holidays_and_warns() {
    // Given: A failing provider and the skip policy
    let client = CannedHttpClient::new(vec![Ok(HttpResponse::with_status(500, "oops"))]);
    let config = SamplerConfig::default().with_holiday(
        HolidayConfig::default().with_failure_policy(HolidayFailurePolicy::SkipFiltering),
    );
    let sampler = DateSampler::new(config).with_http_client(client);

    // When: Holidays are requested
    let outcome = sampler.sample(&christmas_input()).await.expect("fallback");

    // Then: All weekdays stay candidates and the caller is told why
    assert!(!outcome.holidays_applied);
    assert_eq!(outcome.candidate_count, 10);
    assert_eq!(outcome.warnings.len(), 1);
}

#[tokio::test]
async fn when_holidays_shrink_pool_below_batch_system_reports_insufficient_range() {
    // Given: Ten days, two of them holidays, and a batch of nine
    let sampler = DateSampler::default().with_holiday_source(Arc::new(
        StaticHolidaySource::new(dates(&["2021-01-01", "2021-01-06"])),
    ));
    let input = RawInput::new()
        .with_start("2021-01-01")
        .with_end("2021-01-10")
        .with_batch_size("9")
        .with_seed("111")
        .with_holidays_excluded(true);

    // When: The input passes validation but not the holiday filter
    assert!(sampler.validate(&input).is_valid());
    let err = sampler.sample(&input).await.expect_err("pool too small");

    // Then: The sampler reports the shrunken pool
    assert!(matches!(
        err,
        CoreError::Sampling(SamplingError::InsufficientRange {
            requested: 9,
            available: 8
        })
    ));
}

#[tokio::test]
async fn when_static_holidays_are_supplied_system_uses_them_offline() {
    // Given: Two fixed holidays in the reference range
    let sampler = DateSampler::default().with_holiday_source(Arc::new(
        StaticHolidaySource::new(dates(&["2021-01-01", "2021-01-06"])),
    ));
    let input = RawInput::new()
        .with_start("2021-01-01")
        .with_end("2021-01-10")
        .with_batch_size("5")
        .with_seed("111")
        .with_holidays_excluded(true);

    // When: The reference request is sampled
    let outcome = sampler.sample(&input).await.expect("outcome");

    // Then: The batch is drawn from the eight remaining days
    assert_eq!(
        outcome.dates(),
        dates(&["2021-01-02", "2021-01-03", "2021-01-05", "2021-01-09", "2021-01-10"]).as_slice()
    );
}
