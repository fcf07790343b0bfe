/// A trimmed, non-empty location search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim `raw` and reject it if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The subset of a current-weather response the renderer consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: String,
    pub country: String,
    pub icon: String,
    pub description: String,
    /// Degrees Fahrenheit.
    pub temperature: f64,
    /// Degrees Fahrenheit.
    pub feels_like: f64,
    /// Unix seconds of the provider's last update.
    pub updated_at: i64,
}
