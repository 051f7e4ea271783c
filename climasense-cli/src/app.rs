use climasense_core::{ClimaError, ComfortResult, Language, Stage};

use crate::i18n::Message;

/// Rendering context shared by every view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub language: Language,
}

impl RenderContext {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn t(&self, msg: Message<'_>) -> String {
        msg.text(self.language)
    }
}

/// What the front end is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Welcome,
    Loading { stage: Stage, location: String },
    Ready(ComfortResult),
    Failed(ClimaError),
}

impl AppState {
    pub fn is_error(&self) -> bool {
        matches!(self, AppState::Failed(_))
    }
}

pub fn render(state: &AppState, ctx: &RenderContext) -> String {
    match state {
        AppState::Welcome => ctx.t(Message::Welcome),
        AppState::Loading { stage: Stage::FetchingWeather, location } => {
            ctx.t(Message::LoadingWeather { location: location.as_str() })
        }
        AppState::Loading { stage: Stage::PredictingComfort, .. } => ctx.t(Message::LoadingComfort),
        AppState::Ready(result) => render_result(result, ctx),
        AppState::Failed(err) => format!("{}: {err}", ctx.t(Message::ErrorTitle)),
    }
}

fn render_result(result: &ComfortResult, ctx: &RenderContext) -> String {
    let input = &result.input;

    [
        ctx.t(Message::ResultTitle { location: &result.location, date: &result.date }),
        String::new(),
        format!("  {}: {}", ctx.t(Message::Comfort), result.comfort),
        format!("  {}: {}", ctx.t(Message::Summary), result.summary),
        format!("  {}: {}", ctx.t(Message::Recommendation), result.recommendation),
        String::new(),
        format!("  {}:", ctx.t(Message::Conditions)),
        format!("    {}: {}°C", ctx.t(Message::Temperature), input.temp),
        format!("    {}: {}%", ctx.t(Message::Humidity), input.humidity),
        format!("    {}: {} km/h", ctx.t(Message::Wind), input.wind),
        format!("    {}: {}%", ctx.t(Message::Rain), input.rain),
        String::new(),
        format!("{}: {}", ctx.t(Message::Source), result.source),
    ]
    .join("\n")
}

/// Owns the current state and prints every transition.
#[derive(Debug)]
pub struct App {
    state: AppState,
    ctx: RenderContext,
}

impl App {
    pub fn new(ctx: RenderContext) -> Self {
        Self { state: AppState::Welcome, ctx }
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn show(&mut self, state: AppState) {
        let text = render(&state, &self.ctx);
        if state.is_error() {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climasense_core::{PROVENANCE, WeatherInput};

    fn result() -> ComfortResult {
        ComfortResult {
            source: PROVENANCE.to_string(),
            location: "Paris, France".into(),
            date: "2024-06-01".into(),
            input: WeatherInput { temp: 22.0, humidity: 55.0, wind: 10.0, rain: 5.0 },
            comfort: "Comfortable".into(),
            summary: "A mild day.".into(),
            recommendation: "Go for a walk.".into(),
        }
    }

    #[test]
    fn result_view_lists_prediction_and_conditions() {
        let text = render(&AppState::Ready(result()), &RenderContext::new(Language::English));

        assert!(text.starts_with("Comfort forecast for Paris, France on 2024-06-01"));
        assert!(text.contains("Comfort: Comfortable"));
        assert!(text.contains("Recommendation: Go for a walk."));
        assert!(text.contains("Temperature: 22°C"));
        assert!(text.contains("Wind: 10 km/h"));
        assert!(text.ends_with(PROVENANCE));
    }

    #[test]
    fn result_view_groups_sections_with_blank_lines() {
        let text = render(&AppState::Ready(result()), &RenderContext::new(Language::English));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "  Comfort: Comfortable");
        assert_eq!(lines[5], "");
        assert_eq!(lines[10], "    Chance of rain: 5%");
        assert_eq!(lines[11], "");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn hindi_context_localizes_labels_only() {
        let text = render(&AppState::Ready(result()), &RenderContext::new(Language::Hindi));

        assert!(text.contains("आराम: Comfortable"));
        assert!(text.contains("तापमान: 22°C"));
    }

    #[test]
    fn loading_views_follow_stage() {
        let ctx = RenderContext::default();
        let weather = AppState::Loading { stage: Stage::FetchingWeather, location: "Pune".into() };
        let comfort = AppState::Loading { stage: Stage::PredictingComfort, location: "Pune".into() };

        assert_eq!(render(&weather, &ctx), "Fetching weather data for Pune...");
        assert_eq!(render(&comfort, &ctx), "Predicting outdoor comfort...");
    }

    #[test]
    fn failure_view_is_a_single_message() {
        let err = ClimaError::InvalidLocation { location: "Qwzxnotaplace123".into() };
        let text = render(&AppState::Failed(err), &RenderContext::default());

        assert_eq!(text, "Error: The location \"Qwzxnotaplace123\" is invalid or does not exist.");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn show_replaces_state() {
        let mut app = App::new(RenderContext::default());
        assert_eq!(app.state(), &AppState::Welcome);

        app.show(AppState::Failed(ClimaError::Prediction));
        assert!(app.state().is_error());

        app.show(AppState::Ready(result()));
        assert!(matches!(app.state(), AppState::Ready(_)));
    }
}
