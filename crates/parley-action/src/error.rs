//! Error types for the intent handlers.

use parley_core::error::ParleyError;
use parley_intent::IntentKind;

/// Errors from handler internals. Never returned past the handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Intent kind not registered: {0}")]
    UnregisteredHandler(IntentKind),
    #[error("URL rejected: {0}")]
    InvalidUrl(String),
    #[error("Failed to open link: {0}")]
    LinkOpen(String),
    #[error("Weather lookup failed: {0}")]
    Weather(#[from] WeatherError),
    #[error("Core error: {0}")]
    Core(#[from] ParleyError),
}

/// Errors from a weather provider.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("no weather API key configured")]
    MissingApiKey,
    #[error("weather request failed: {0}")]
    Request(String),
    #[error("weather provider returned HTTP {0}")]
    Status(u16),
    #[error("weather response could not be decoded: {0}")]
    Decode(String),
    #[error("weather fetch timed out after {0} ms")]
    Timeout(u64),
}
