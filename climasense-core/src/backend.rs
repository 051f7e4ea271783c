use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;
use thiserror::Error;

pub mod gemini;

pub use gemini::GeminiClient;

/// One prompt sent to a generative-language backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    /// Let the model ground its answer with live web search.
    pub web_search: bool,
    /// When set, the backend must answer with JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature: 0.0,
            web_search: false,
            response_schema: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_web_search(mut self) -> Self {
        self.web_search = true;
        self
    }

    pub fn with_response_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Failures of the backend call itself, before any response interpretation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("backend rejected the credentials: {0}")]
    Auth(String),

    #[error("backend request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to reach backend: {0}")]
    Transport(String),

    #[error("backend returned no candidates")]
    EmptyResponse,

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn is_auth(&self) -> bool {
        matches!(self, BackendError::Auth(_))
    }
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync + Debug {
    /// Send `request` and return the model's raw text answer.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::{collections::VecDeque, sync::Mutex};

    /// Backend that replays canned answers and records every request.
    #[derive(Debug, Default)]
    pub struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<String, BackendError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(self, err: BackendError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(BackendError::EmptyResponse))
        }
    }
}
