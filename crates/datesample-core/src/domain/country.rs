use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::holidays::HolidayLookupError;

/// ISO 3166-1 alpha-2 country code, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(input: &str) -> Result<Self, HolidayLookupError> {
        let trimmed = input.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(HolidayLookupError::invalid_request(format!(
                "country code must be two ASCII letters: '{input}'"
            )));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Luxembourg, the default holiday calendar.
    pub fn luxembourg() -> Self {
        Self(String::from("LU"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CountryCode {
    type Error = HolidayLookupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_uppercase() {
        let code = CountryCode::parse(" de ").expect("valid code");
        assert_eq!(code.as_str(), "DE");
    }

    #[test]
    fn rejects_wrong_length_and_digits() {
        assert!(CountryCode::parse("DEU").is_err());
        assert!(CountryCode::parse("D1").is_err());
        assert!(CountryCode::parse("").is_err());
    }
}
