//! Stage two: turn a [`WeatherInput`] into a localized [`ComfortResult`].

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{
    backend::{GenerationRequest, GenerativeBackend},
    error::ClimaError,
    model::{ComfortResult, Language, LocationDateInput, PROVENANCE, WeatherInput},
};

/// Phrasing varies a little between calls; the facts are already fixed.
const COMFORT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Clone)]
pub struct ComfortPredictor {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

impl ComfortPredictor {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self { backend, model: model.into() }
    }

    pub async fn predict(
        &self,
        weather: &WeatherInput,
        context: &LocationDateInput,
        language: Language,
    ) -> Result<ComfortResult, ClimaError> {
        let request = GenerationRequest::new(&self.model, comfort_prompt(weather, context, language))
            .with_response_schema(response_schema(language))
            .with_temperature(COMFORT_TEMPERATURE);

        debug!(location = context.location(), %language, "predicting comfort");

        let text = self.backend.generate(&request).await.map_err(|e| {
            error!(location = context.location(), error = %e, "comfort request failed");
            if e.is_auth() { ClimaError::invalid_credentials() } else { ClimaError::Prediction }
        })?;

        let answer = parse_comfort_response(&text).inspect_err(|e| {
            error!(location = context.location(), error = %e, "comfort response rejected");
        })?;

        Ok(ComfortResult {
            source: PROVENANCE.to_string(),
            location: context.location().to_string(),
            date: context.date().to_string(),
            input: *weather,
            comfort: answer.comfort,
            summary: answer.summary,
            recommendation: answer.recommendation,
        })
    }
}

/// The three fields the model must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComfortAnswer {
    pub comfort: String,
    pub summary: String,
    pub recommendation: String,
}

pub fn parse_comfort_response(text: &str) -> Result<ComfortAnswer, ClimaError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| ClimaError::upstream_format(format!("comfort response is not JSON: {e}")))?;

    let field = |key: &str| -> Result<String, ClimaError> {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                ClimaError::upstream_format(format!("comfort field '{key}' is missing or empty"))
            })
    };

    Ok(ComfortAnswer {
        comfort: field("comfort")?,
        summary: field("summary")?,
        recommendation: field("recommendation")?,
    })
}

pub fn comfort_prompt(weather: &WeatherInput, context: &LocationDateInput, language: Language) -> String {
    let WeatherInput { temp, humidity, wind, rain } = *weather;
    let location = context.location();
    let date = context.date();

    match language {
        Language::English => format!(
            "You are an expert meteorologist who specialises in human comfort.
Predict how comfortable it feels to be outdoors in \"{location}\" on {date}, given these conditions:

- Temperature: {temp}°C
- Humidity: {humidity}%
- Wind speed: {wind} km/h
- Chance of precipitation: {rain}%

Give a comfort level as one word or a short phrase, a single-sentence summary of how it feels, \
and one short, actionable recommendation for outdoor activities.
Return only the raw JSON object, with no explanations, conversation or markdown. Please answer in English."
        ),
        Language::Hindi => format!(
            "आप एक विशेषज्ञ मौसम विज्ञानी हैं जो मानव आराम के विषय में विशेषज्ञता रखते हैं।
नीचे दी गई मौसम की स्थिति के आधार पर अनुमान लगाएं कि \"{location}\" में {date} को बाहर रहना कितना आरामदायक लगेगा:

- तापमान: {temp}°C
- आर्द्रता: {humidity}%
- हवा की गति: {wind} km/h
- वर्षा की संभावना: {rain}%

आराम के स्तर के लिए एक शब्द या छोटा वाक्यांश, अनुभव का एक-वाक्य सारांश, \
और बाहरी गतिविधियों के लिए एक छोटी, व्यावहारिक सिफारिश दें।
केवल कच्चा JSON ऑब्जेक्ट लौटाएं, कोई स्पष्टीकरण, बातचीत या मार्कडाउन नहीं। कृपया हिंदी में उत्तर दें।"
        ),
    }
}

/// JSON schema the comfort answer must follow, with field descriptions in `language`.
pub fn response_schema(language: Language) -> Value {
    let (comfort, summary, recommendation) = match language {
        Language::English => (
            "One word or a short phrase for the comfort level, e.g. Comfortable, Cool, \
             Mildly Uncomfortable, Hot, Very Cold, Windy, Humid, Wet, Stormy.",
            "One short sentence describing how it feels to be outdoors in these conditions.",
            "One short, actionable recommendation for an outdoor activity in these conditions, \
             e.g. 'Perfect for a picnic!' or 'Best to stay indoors.'",
        ),
        Language::Hindi => (
            "आराम के स्तर के लिए एक शब्द या छोटा वाक्यांश, जैसे: आरामदायक, ठंडा, हल्का असुविधाजनक, \
             गर्म, बहुत ठंडा, हवादार, आर्द्र, गीला, तूफानी।",
            "इन परिस्थितियों में बाहर रहने के अनुभव का एक छोटा, एक-वाक्य सारांश।",
            "इन परिस्थितियों में बाहरी गतिविधि के लिए एक छोटी, व्यावहारिक सिफारिश, जैसे: \
             'पिकनिक के लिए बिल्कुल सही!' या 'घर के अंदर रहना ही बेहतर है।'",
        ),
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "comfort": { "type": "STRING", "description": comfort },
            "summary": { "type": "STRING", "description": summary },
            "recommendation": { "type": "STRING", "description": recommendation },
        },
        "required": ["comfort", "summary", "recommendation"],
    })
}
