use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::{Config, model::WeatherReading};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Builds current-weather request URLs for one API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWeatherEndpoint {
    base_url: String,
    api_key: String,
}

impl OpenWeatherEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::new(config.base_url.clone(), api_key))
    }

    /// `{base}?q={query}&units=imperial&appid={key}`.
    ///
    /// The query is embedded as typed; no percent-encoding happens here.
    pub fn current_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&units=imperial&appid={}",
            self.base_url, query, self.api_key
        )
    }
}

pub fn map_url(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={latitude},{longitude}")
}

pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    coord: OwCoord,
    name: String,
    sys: OwSys,
    weather: Vec<OwWeather>,
    main: OwMain,
    dt: i64,
}

impl TryFrom<OwCurrentResponse> for WeatherReading {
    type Error = anyhow::Error;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self> {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather response contained no weather conditions"))?;

        Ok(WeatherReading {
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
            location_name: parsed.name,
            country: parsed.sys.country,
            icon: condition.icon,
            description: condition.description,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            updated_at: parsed.dt,
        })
    }
}

/// Decode a current-weather JSON body. Unknown fields are ignored.
pub fn parse_current(body: &str) -> Result<WeatherReading> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;
    WeatherReading::try_from(parsed)
}
