use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ClimaError;

/// Provenance stamped on every successful prediction.
pub const PROVENANCE: &str = "the ClimaSense AI Prediction Model.";

/// A submitted (location, date) pair.
///
/// Fields are private so a value can only exist after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDateInput {
    location: String,
    date: String,
}

impl LocationDateInput {
    /// Validate and build an input. The location is trimmed; the date must be `YYYY-MM-DD`.
    pub fn new(location: impl Into<String>, date: impl Into<String>) -> Result<Self, ClimaError> {
        let location = location.into().trim().to_string();
        if location.is_empty() {
            return Err(ClimaError::invalid_input("location must not be empty"));
        }

        let date = date.into().trim().to_string();
        NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
            ClimaError::invalid_input(format!("date '{date}' is not a YYYY-MM-DD calendar date"))
        })?;

        Ok(Self { location, date })
    }

    pub fn from_date(location: impl Into<String>, date: NaiveDate) -> Result<Self, ClimaError> {
        Self::new(location, date.format("%Y-%m-%d").to_string())
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

/// Four-metric weather snapshot for a location and date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherInput {
    /// Average temperature, °C.
    pub temp: f64,
    /// Average relative humidity, percent.
    pub humidity: f64,
    /// Average wind speed, km/h.
    pub wind: f64,
    /// Chance of precipitation, percent.
    pub rain: f64,
}

/// Terminal artifact of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComfortResult {
    pub source: String,
    pub location: String,
    pub date: String,
    pub input: WeatherInput,
    pub comfort: String,
    pub summary: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub const fn all() -> &'static [Language] {
        &[Language::English, Language::Hindi]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ClimaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "hi" | "hindi" => Ok(Language::Hindi),
            _ => Err(ClimaError::invalid_input(format!(
                "unsupported language '{value}'. Supported languages: en, hi."
            ))),
        }
    }
}

/// Progress notifications emitted while a submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingWeather,
    PredictingComfort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_trims_location() {
        let input = LocationDateInput::new("  Paris, France ", "2024-06-01").unwrap();
        assert_eq!(input.location(), "Paris, France");
        assert_eq!(input.date(), "2024-06-01");
    }

    #[test]
    fn input_rejects_blank_location() {
        let err = LocationDateInput::new("   ", "2024-06-01").unwrap_err();
        assert!(matches!(err, ClimaError::InvalidInput(_)));
    }

    #[test]
    fn input_rejects_non_iso_dates() {
        for date in ["01/06/2024", "2024-13-01", "2024-02-30", "tomorrow", ""] {
            let err = LocationDateInput::new("Paris", date).unwrap_err();
            assert!(matches!(err, ClimaError::InvalidInput(_)), "{date} should be rejected");
        }
    }

    #[test]
    fn input_from_naive_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let input = LocationDateInput::from_date("Paris", date).unwrap();
        assert_eq!(input.date(), "2024-06-01");
    }

    #[test]
    fn language_code_roundtrip() {
        for lang in Language::all() {
            let parsed: Language = lang.code().parse().expect("roundtrip should succeed");
            assert_eq!(*lang, parsed);
        }
    }

    #[test]
    fn unknown_language_error() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("unsupported language"));
    }
}
