//! Weather lookup.
//!
//! The [`WeatherProvider`] trait is the seam the weather handler depends on.
//! [`OpenWeatherProvider`] implements it against an OpenWeatherMap-compatible
//! current-conditions endpoint.

use async_trait::async_trait;
use parley_core::config::WeatherConfig;
use serde::Deserialize;

use crate::error::WeatherError;

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature_fahrenheit: f64,
    pub humidity_percent: f64,
    pub description: String,
}

impl WeatherReport {
    /// Spoken summary for `city`.
    pub fn summary(&self, city: &str) -> String {
        format!(
            "The temperature in {} is {} degrees Fahrenheit. The humidity is {}% and the weather is {}.",
            city,
            round_half_up(self.temperature_fahrenheit),
            self.humidity_percent,
            self.description
        )
    }
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Source of current weather conditions.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

// =============================================================================
// OpenWeatherMap
// =============================================================================

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

/// Decode an OpenWeatherMap current-conditions body.
pub fn parse_current_conditions(body: &str) -> Result<WeatherReport, WeatherError> {
    let parsed: CurrentConditions =
        serde_json::from_str(body).map_err(|e| WeatherError::Decode(e.to_string()))?;
    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|c| c.description)
        .ok_or_else(|| WeatherError::Decode("missing weather description".to_string()))?;
    Ok(WeatherReport {
        temperature_fahrenheit: parsed.main.temp,
        humidity_percent: parsed.main.humidity,
        description,
    })
}

/// OpenWeatherMap-compatible HTTP provider.
pub struct OpenWeatherProvider {
    client: reqwest::Client,
    endpoint: String,
    units: String,
    api_key: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            units: config.units.clone(),
            api_key: config.resolve_api_key(),
        })
    }
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("endpoint", &self.endpoint)
            .field("units", &self.units)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        tracing::debug!(city = %city, endpoint = %self.endpoint, "Fetching weather");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", api_key), ("units", self.units.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Request(e.to_string()))?;
        parse_current_conditions(&body)
    }
}
