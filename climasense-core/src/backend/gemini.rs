use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    backend::{BackendError, GenerationRequest, GenerativeBackend},
    config::Config,
    error::ClimaError,
};

/// Marker Gemini puts in the error message when the key is rejected.
const INVALID_KEY_MARKER: &str = "API key not valid";

/// REST client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Build a client from config. Fails with a configuration error when no key is set.
    pub fn from_config(config: &Config) -> Result<Self, ClimaError> {
        let api_key = config.api_key()?;
        Ok(Self::new(api_key, config.gemini_base_url()))
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
struct GmRequest<'a> {
    contents: Vec<GmContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(rename = "generationConfig")]
    generation_config: GmGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GmContent<'a> {
    role: &'static str,
    parts: Vec<GmPartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct GmPartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GmGenerationConfig<'a> {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct GmResponse {
    #[serde(default)]
    candidates: Vec<GmCandidate>,
}

#[derive(Debug, Deserialize)]
struct GmCandidate {
    content: Option<GmCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GmCandidateContent {
    #[serde(default)]
    parts: Vec<GmPartIn>,
}

#[derive(Debug, Deserialize)]
struct GmPartIn {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmErrorEnvelope {
    error: GmErrorBody,
}

#[derive(Debug, Deserialize)]
struct GmErrorBody {
    message: String,
}

fn build_body(request: &GenerationRequest) -> GmRequest<'_> {
    let tools = if request.web_search {
        vec![serde_json::json!({ "google_search": {} })]
    } else {
        Vec::new()
    };

    GmRequest {
        contents: vec![GmContent { role: "user", parts: vec![GmPartOut { text: &request.prompt }] }],
        tools,
        generation_config: GmGenerationConfig {
            temperature: request.temperature,
            response_mime_type: request.response_schema.as_ref().map(|_| "application/json"),
            response_schema: request.response_schema.as_ref(),
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, BackendError> {
    let parsed: GmResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    let parts = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .ok_or(BackendError::EmptyResponse)?;

    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() {
        return Err(BackendError::EmptyResponse);
    }

    Ok(text)
}

/// Turn a non-success response into a [`BackendError`], spotting credential problems.
fn classify_failure(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<GmErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| truncate_body(body));

    let auth_status = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
    if auth_status || message.contains(INVALID_KEY_MARKER) {
        BackendError::Auth(message)
    } else {
        BackendError::Status { status: status.as_u16(), message }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        debug!(
            model = %request.model,
            web_search = request.web_search,
            schema = request.response_schema.is_some(),
            temperature = request.temperature,
            "sending generateContent request"
        );

        let res = self
            .http
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        extract_text(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
