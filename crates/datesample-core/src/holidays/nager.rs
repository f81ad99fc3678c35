use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use super::{
    ensure_success, parse_upstream_date, HolidayLookupError, HolidayProviderId, HolidayQuery,
    HolidaySet, HolidaySource,
};
use crate::http_client::{HttpClient, HttpRequest};

const DEFAULT_BASE_URL: &str = "https://date.nager.at";

#[derive(Debug, Deserialize)]
struct NagerHoliday {
    date: String,
}

/// Adapter for the Nager.Date public-holiday API.
///
/// The upstream is keyed by year, so one request is issued per calendar year
/// the query touches.
#[derive(Clone)]
pub struct NagerDateSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl NagerDateSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_ms: 3_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch(&self, query: HolidayQuery) -> Result<HolidaySet, HolidayLookupError> {
        let mut holidays = HolidaySet::new();

        for year in query.years() {
            let endpoint = format!(
                "{}/api/v3/PublicHolidays/{}/{}",
                self.base_url,
                year,
                urlencoding::encode(query.country.as_str())
            );
            let request = HttpRequest::get(endpoint)
                .with_header("accept", "application/json")
                .with_timeout_ms(self.timeout_ms);

            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| HolidayLookupError::transport(&error))?;
            ensure_success(self.id(), &response)?;

            let entries: Vec<NagerHoliday> = serde_json::from_str(&response.body)
                .map_err(|e| HolidayLookupError::parse(format!("failed to parse nager response: {e}")))?;

            for entry in entries {
                holidays.insert(parse_upstream_date(self.id(), &entry.date)?);
            }
        }

        Ok(holidays.within(query.start, query.end))
    }
}

impl HolidaySource for NagerDateSource {
    fn id(&self) -> HolidayProviderId {
        HolidayProviderId::NagerDate
    }

    fn holidays<'a>(
        &'a self,
        query: HolidayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>> {
        Box::pin(self.fetch(query))
    }
}
