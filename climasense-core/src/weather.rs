//! Stage one: turn a (location, date) pair into a validated [`WeatherInput`].

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::{
    backend::{GenerationRequest, GenerativeBackend},
    error::ClimaError,
    model::{LocationDateInput, WeatherInput},
    normalize::strip_code_fence,
};

/// Key the model uses to signal an unknown place.
const SENTINEL_KEY: &str = "error";

#[derive(Debug, Clone)]
pub struct WeatherResolver {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

impl WeatherResolver {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self { backend, model: model.into() }
    }

    /// Ask the backend for the weather at `input`'s place and date.
    pub async fn resolve(&self, input: &LocationDateInput) -> Result<WeatherInput, ClimaError> {
        let request = GenerationRequest::new(&self.model, weather_prompt(input))
            .with_web_search()
            .with_temperature(0.0);

        debug!(location = input.location(), date = input.date(), "resolving weather");

        let text = self.backend.generate(&request).await.map_err(|e| {
            error!(location = input.location(), error = %e, "weather request failed");
            if e.is_auth() {
                ClimaError::invalid_credentials()
            } else {
                ClimaError::WeatherFetch { location: input.location().to_string() }
            }
        })?;

        parse_weather_response(&text, input.location()).inspect_err(|e| {
            if is_unknown_place(e) {
                warn!(location = input.location(), "model reported an unknown place");
            } else {
                error!(location = input.location(), error = %e, "weather response rejected");
            }
        })
    }
}

pub fn weather_prompt(input: &LocationDateInput) -> String {
    format!(
        r#"Step 1: use Google Search to check whether "{location}" is a real geographical place.
If it is not a real place, reply with exactly this JSON and nothing else: {{"error": "Invalid location specified."}}
Step 2: if it is a real place, look up the weather there for {date} and report:
- average temperature in degrees Celsius
- average relative humidity in percent
- average wind speed in kilometers per hour (km/h)
- chance of precipitation in percent

Reply with one compact JSON object using the keys "temp", "humidity", "wind" and "rain", with numeric values only.
Example: {{"temp": 15, "humidity": 70, "wind": 12, "rain": 5}}
Do not add explanations, prose or markdown formatting."#,
        location = input.location(),
        date = input.date(),
    )
}

/// An unknown place is a user input problem, not a service fault.
fn is_unknown_place(err: &ClimaError) -> bool {
    matches!(err, ClimaError::InvalidLocation { .. })
}

/// Validate the model's raw answer for `location`.
pub fn parse_weather_response(text: &str, location: &str) -> Result<WeatherInput, ClimaError> {
    let payload = strip_code_fence(text);

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ClimaError::upstream_format(format!("weather response is not JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| ClimaError::upstream_format("weather response is not a JSON object"))?;

    if carries_sentinel(object) {
        return Err(ClimaError::InvalidLocation { location: location.to_string() });
    }

    let weather = WeatherInput {
        temp: numeric_field(object, "temp")?,
        humidity: numeric_field(object, "humidity")?,
        wind: numeric_field(object, "wind")?,
        rain: numeric_field(object, "rain")?,
    };

    check_ranges(&weather)?;
    Ok(weather)
}

fn carries_sentinel(object: &Map<String, Value>) -> bool {
    match object.get(SENTINEL_KEY) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn numeric_field(object: &Map<String, Value>, key: &str) -> Result<f64, ClimaError> {
    let value = object
        .get(key)
        .ok_or_else(|| ClimaError::upstream_format(format!("weather field '{key}' is missing")))?;

    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ClimaError::upstream_format(format!("weather field '{key}' is not numeric")))
}

fn check_ranges(weather: &WeatherInput) -> Result<(), ClimaError> {
    let percent = 0.0..=100.0;

    if !percent.contains(&weather.humidity) {
        return Err(ClimaError::upstream_format(format!(
            "humidity {} is outside 0-100",
            weather.humidity
        )));
    }
    if !percent.contains(&weather.rain) {
        return Err(ClimaError::upstream_format(format!(
            "chance of rain {} is outside 0-100",
            weather.rain
        )));
    }
    if weather.wind < 0.0 {
        return Err(ClimaError::upstream_format(format!("wind speed {} is negative", weather.wind)));
    }

    Ok(())
}
