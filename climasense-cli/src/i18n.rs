use climasense_core::Language;

/// Every user-facing string the front end prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    Welcome,
    LocationPrompt,
    Locating,
    LocationUnknown,
    LoadingWeather { location: &'a str },
    LoadingComfort,
    ErrorTitle,
    ConfigureHint,
    ResultTitle { location: &'a str, date: &'a str },
    Comfort,
    Summary,
    Recommendation,
    Conditions,
    Temperature,
    Humidity,
    Wind,
    Rain,
    Source,
}

impl Message<'_> {
    pub fn text(&self, lang: Language) -> String {
        match lang {
            Language::English => self.english(),
            Language::Hindi => self.hindi(),
        }
    }

    fn english(&self) -> String {
        match *self {
            Message::Welcome => {
                "Welcome to ClimaSense! Enter a location and a date to see how comfortable it will feel outdoors."
                    .into()
            }
            Message::LocationPrompt => "Location:".into(),
            Message::Locating => "Looking up your location...".into(),
            Message::LocationUnknown => {
                "Could not name the place at those coordinates. Please type a location.".into()
            }
            Message::LoadingWeather { location } => format!("Fetching weather data for {location}..."),
            Message::LoadingComfort => "Predicting outdoor comfort...".into(),
            Message::ErrorTitle => "Error".into(),
            Message::ConfigureHint => {
                "Run `climasense configure` or set GEMINI_API_KEY, then try again.".into()
            }
            Message::ResultTitle { location, date } => format!("Comfort forecast for {location} on {date}"),
            Message::Comfort => "Comfort".into(),
            Message::Summary => "Summary".into(),
            Message::Recommendation => "Recommendation".into(),
            Message::Conditions => "Conditions".into(),
            Message::Temperature => "Temperature".into(),
            Message::Humidity => "Humidity".into(),
            Message::Wind => "Wind".into(),
            Message::Rain => "Chance of rain".into(),
            Message::Source => "Source".into(),
        }
    }

    fn hindi(&self) -> String {
        match *self {
            Message::Welcome => {
                "ClimaSense में आपका स्वागत है! बाहर कितना आरामदायक रहेगा, यह जानने के लिए स्थान और तारीख दर्ज करें।"
                    .into()
            }
            Message::LocationPrompt => "स्थान:".into(),
            Message::Locating => "आपका स्थान खोजा जा रहा है...".into(),
            Message::LocationUnknown => {
                "इन निर्देशांकों पर स्थान का नाम नहीं मिल सका। कृपया स्थान टाइप करें।".into()
            }
            Message::LoadingWeather { location } => format!("{location} के लिए मौसम डेटा लाया जा रहा है..."),
            Message::LoadingComfort => "बाहरी आराम का अनुमान लगाया जा रहा है...".into(),
            Message::ErrorTitle => "त्रुटि".into(),
            Message::ConfigureHint => {
                "`climasense configure` चलाएँ या GEMINI_API_KEY सेट करें, फिर दोबारा प्रयास करें।".into()
            }
            Message::ResultTitle { location, date } => format!("{location} के लिए {date} का आराम पूर्वानुमान"),
            Message::Comfort => "आराम".into(),
            Message::Summary => "सारांश".into(),
            Message::Recommendation => "सिफारिश".into(),
            Message::Conditions => "मौसम की स्थिति".into(),
            Message::Temperature => "तापमान".into(),
            Message::Humidity => "आर्द्रता".into(),
            Message::Wind => "हवा की गति".into(),
            Message::Rain => "वर्षा की संभावना".into(),
            Message::Source => "स्रोत".into(),
        }
    }
}
