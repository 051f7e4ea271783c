use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::info;

use crate::{
    backend::{GeminiClient, GenerativeBackend},
    comfort::ComfortPredictor,
    config::Config,
    error::ClimaError,
    model::{ComfortResult, Language, LocationDateInput, Stage},
    weather::WeatherResolver,
};

/// Runs the weather stage, then the comfort stage, for one submission at a time.
#[derive(Debug)]
pub struct Pipeline {
    resolver: WeatherResolver,
    predictor: ComfortPredictor,
    in_flight: AtomicBool,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: &str) -> Self {
        Self {
            resolver: WeatherResolver::new(backend.clone(), model),
            predictor: ComfortPredictor::new(backend, model),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Pipeline backed by Gemini, using the configured key and model.
    pub fn from_config(config: &Config) -> Result<Self, ClimaError> {
        let client = GeminiClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config.model()))
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(
        &self,
        input: &LocationDateInput,
        language: Language,
    ) -> Result<ComfortResult, ClimaError> {
        self.submit_with_progress(input, language, |_| {}).await
    }

    /// Submit `input`, reporting each stage to `on_stage` before it starts.
    ///
    /// Fails with [`ClimaError::Busy`] while another submission is outstanding.
    pub async fn submit_with_progress<F>(
        &self,
        input: &LocationDateInput,
        language: Language,
        mut on_stage: F,
    ) -> Result<ComfortResult, ClimaError>
    where
        F: FnMut(Stage),
    {
        let _guard = InFlight::acquire(&self.in_flight)?;

        on_stage(Stage::FetchingWeather);
        let weather = self.resolver.resolve(input).await?;

        on_stage(Stage::PredictingComfort);
        let result = self.predictor.predict(&weather, input, language).await?;

        info!(location = input.location(), date = input.date(), comfort = %result.comfort, "prediction ready");
        Ok(result)
    }
}

/// Holds the in-flight flag until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ClimaError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClimaError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
