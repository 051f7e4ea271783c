use thiserror::Error;

/// Every failure a caller of the pipeline can observe.
///
/// Lower-level transport and parsing errors are re-classified into one of
/// these variants before they leave a stage.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClimaError {
    /// The submitted location does not denote a real place.
    #[error("The location \"{location}\" is invalid or does not exist.")]
    InvalidLocation { location: String },

    /// The model answered, but not with the structured data we asked for.
    #[error("AI model returned data in an invalid format: {0}")]
    UpstreamFormat(String),

    /// Missing or rejected credentials. Not fixable by the end user.
    #[error("{0}")]
    Configuration(String),

    /// Reverse geocoding failed; the location can still be typed manually.
    #[error("Could not determine address from coordinates: {0}")]
    Geocoding(String),

    #[error(
        "Failed to get weather data for {location}. \
         The location might be invalid or data may be unavailable for the selected date."
    )]
    WeatherFetch { location: String },

    #[error("Failed to get a prediction from the AI model. Please try again later.")]
    Prediction,

    /// Form input rejected before any network call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another submission is still outstanding.
    #[error("A prediction is already in progress.")]
    Busy,
}

impl ClimaError {
    pub fn upstream_format<S: Into<String>>(message: S) -> Self {
        Self::UpstreamFormat(message.into())
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Error raised when the generative backend rejects the API key.
    pub fn invalid_credentials() -> Self {
        Self::Configuration(
            "The configured API key is not valid. Please check your environment configuration."
                .to_string(),
        )
    }

    /// Error raised when no API key is configured at all.
    pub fn missing_credentials() -> Self {
        Self::Configuration("No API key configured.".to_string())
    }

    /// Whether the end user can fix this by changing their input or retrying.
    pub fn is_user_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}
