use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use climasense_core::{
    ClimaError, Config, Language, LocationDateInput, Pipeline, ReverseGeocoder, UNKNOWN_LOCATION,
    config::DEFAULT_MODEL,
};
use inquire::{Password, Text};
use tracing::debug;

use crate::{
    app::{App, AppState, RenderContext},
    i18n::Message,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "climasense", version, about = "AI-predicted outdoor comfort for any place and date")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Gemini API key (and optionally the model) in the config file.
    Configure,

    /// Predict outdoor comfort for a location and date.
    Predict {
        /// Place name or address. Pre-filled from --lat/--lon or prompted when absent.
        location: Option<String>,

        /// Date as YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Answer language: en or hi.
        #[arg(long, default_value = "en")]
        lang: Language,

        #[command(flatten)]
        coords: Coordinates,
    },

    /// Print the address for a pair of coordinates.
    Locate {
        #[command(flatten)]
        coords: Coordinates,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl Coordinates {
    fn pair(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Predict { location, date, lang, coords } => {
                predict(&config, location, date, lang, coords).await
            }
            Command::Locate { coords } => locate(&config, coords).await,
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<ExitCode> {
    let api_key = Password::new("Gemini API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let model = Text::new("Model:")
        .with_default(config.model())
        .prompt()
        .context("Failed to read model name")?;

    config.set_api_key(api_key.trim().to_string());
    config.model = (model.trim() != DEFAULT_MODEL).then(|| model.trim().to_string());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn predict(
    config: &Config,
    location: Option<String>,
    date: Option<NaiveDate>,
    lang: Language,
    coords: Coordinates,
) -> anyhow::Result<ExitCode> {
    let mut app = App::new(RenderContext::new(lang));

    let location = match location {
        Some(location) => location,
        None => {
            app.show(AppState::Welcome);
            let ctx = *app.context();
            match prefill_location(config, coords, &ctx).await {
                Ok(location) => location,
                Err(err) => return Ok(fail(&mut app, err)),
            }
        }
    };

    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let input = match LocationDateInput::from_date(location, date) {
        Ok(input) => input,
        Err(err) => return Ok(fail(&mut app, err)),
    };

    let pipeline = match Pipeline::from_config(config) {
        Ok(pipeline) => pipeline,
        Err(err) => return Ok(fail(&mut app, err)),
    };

    debug!(location = input.location(), date = input.date(), %lang, "submitting prediction");

    let outcome = pipeline
        .submit_with_progress(&input, lang, |stage| {
            app.show(AppState::Loading { stage, location: input.location().to_string() })
        })
        .await;

    match outcome {
        Ok(result) => {
            app.show(AppState::Ready(result));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(fail(&mut app, err)),
    }
}

/// Work out the location when none was given on the command line.
///
/// Coordinates are reverse geocoded first. The "Unknown location" placeholder is never
/// submitted; the user is asked to type a place instead.
async fn prefill_location(
    config: &Config,
    coords: Coordinates,
    ctx: &RenderContext,
) -> Result<String, ClimaError> {
    if let Some((lat, lon)) = coords.pair() {
        println!("{}", Message::Locating.text(ctx.language));

        let address = ReverseGeocoder::from_config(config)?.reverse(lat, lon).await?;
        if let Some(address) = usable_prefill(address) {
            return Ok(address);
        }

        println!("{}", Message::LocationUnknown.text(ctx.language));
    }

    Text::new(&Message::LocationPrompt.text(ctx.language))
        .prompt()
        .map_err(|e| ClimaError::invalid_input(format!("no location entered: {e}")))
}

/// A geocoded address worth submitting, or `None` for the placeholder.
fn usable_prefill(address: String) -> Option<String> {
    (address != UNKNOWN_LOCATION).then_some(address)
}

async fn locate(config: &Config, coords: Coordinates) -> anyhow::Result<ExitCode> {
    let (lat, lon) = coords
        .pair()
        .ok_or_else(|| anyhow::anyhow!("Both --lat and --lon are required."))?;

    let address = ReverseGeocoder::from_config(config)?.reverse(lat, lon).await?;
    println!("{address}");
    Ok(ExitCode::SUCCESS)
}

/// Exit status for errors only the operator can fix (credentials, config).
const EXIT_CONFIGURATION: u8 = 2;

fn fail(app: &mut App, err: ClimaError) -> ExitCode {
    let status = exit_status(&err);
    let hint = operator_hint(&err, app.context());

    app.show(AppState::Failed(err));
    if let Some(hint) = hint {
        eprintln!("{hint}");
    }
    ExitCode::from(status)
}

fn exit_status(err: &ClimaError) -> u8 {
    if err.is_user_recoverable() { 1 } else { EXIT_CONFIGURATION }
}

fn operator_hint(err: &ClimaError, ctx: &RenderContext) -> Option<String> {
    (!err.is_user_recoverable()).then(|| Message::ConfigureHint.text(ctx.language))
}
