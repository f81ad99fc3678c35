use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use super::{
    ensure_success, parse_upstream_date, HolidayLookupError, HolidayProviderId, HolidayQuery,
    HolidaySet, HolidaySource,
};
use crate::http_client::{HttpClient, HttpRequest};

const DEFAULT_BASE_URL: &str = "https://openholidaysapi.org";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenHolidaysEntry {
    start_date: String,
    end_date: Option<String>,
}

/// Adapter for the OpenHolidays public-holiday endpoint.
///
/// One request covers the whole range; entries spanning several days are
/// expanded to every day they cover.
#[derive(Clone)]
pub struct OpenHolidaysSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    language: String,
    timeout_ms: u64,
}

impl OpenHolidaysSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            language: String::from("EN"),
            timeout_ms: 3_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, query: &HolidayQuery) -> String {
        format!(
            "{}/PublicHolidays?countryIsoCode={}&languageIsoCode={}&validFrom={}&validTo={}",
            self.base_url,
            urlencoding::encode(query.country.as_str()),
            urlencoding::encode(&self.language),
            query.start,
            query.end
        )
    }

    async fn fetch(&self, query: HolidayQuery) -> Result<HolidaySet, HolidayLookupError> {
        let request = HttpRequest::get(self.endpoint(&query))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| HolidayLookupError::transport(&error))?;
        ensure_success(self.id(), &response)?;

        let entries: Vec<OpenHolidaysEntry> = serde_json::from_str(&response.body)
            .map_err(|e| HolidayLookupError::parse(format!("failed to parse openholidays response: {e}")))?;

        let mut holidays = HolidaySet::new();
        for entry in entries {
            let first = parse_upstream_date(self.id(), &entry.start_date)?;
            let last = match entry.end_date.as_deref() {
                Some(value) => parse_upstream_date(self.id(), value)?,
                None => first,
            };

            let mut day = Some(first);
            while let Some(current) = day.filter(|date| *date <= last) {
                if current >= query.start && current <= query.end {
                    holidays.insert(current);
                }
                day = current.next_day();
            }
        }

        tracing::debug!(
            country = query.country.as_str(),
            holidays = holidays.len(),
            "openholidays lookup complete"
        );
        Ok(holidays)
    }
}

impl HolidaySource for OpenHolidaysSource {
    fn id(&self) -> HolidayProviderId {
        HolidayProviderId::OpenHolidays
    }

    fn holidays<'a>(
        &'a self,
        query: HolidayQuery,
    ) -> Pin<Box<dyn Future<Output = Result<HolidaySet, HolidayLookupError>> + Send + 'a>> {
        Box::pin(self.fetch(query))
    }
}
