//! Core library for ClimaSense.
//!
//! This crate defines:
//! - Shared domain models (inputs, weather snapshot, comfort result)
//! - The error taxonomy every stage reports through
//! - Configuration & credentials handling
//! - An abstraction over generative-language backends, with a Gemini client
//! - The weather and comfort stages and the pipeline chaining them
//! - Reverse geocoding for pre-filling a location
//!
//! It is used by `climasense-cli`, but can also be reused by other front ends.

pub mod backend;
pub mod comfort;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod weather;

pub use backend::{BackendError, GeminiClient, GenerationRequest, GenerativeBackend};
pub use comfort::ComfortPredictor;
pub use config::Config;
pub use error::ClimaError;
pub use geocoding::{ReverseGeocoder, UNKNOWN_LOCATION};
pub use model::{ComfortResult, Language, LocationDateInput, PROVENANCE, Stage, WeatherInput};
pub use pipeline::Pipeline;
pub use weather::WeatherResolver;
