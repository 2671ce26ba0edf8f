use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ParleyError, Result};

/// Top-level configuration for the parley assistant.
///
/// Loaded from `~/.parley/config.toml` by default. Every section falls back to
/// its defaults when omitted, so a partial file is always valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl ParleyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParleyConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ParleyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Who the assistant is talking to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Display name used in greetings and identity answers.
    pub name: String,
    /// Home city, used for weather lookups.
    pub city: String,
    /// Locale passed to the capture engine and the synthesizer.
    pub locale: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            name: "Luke Abel".to_string(),
            city: "La Mirada".to_string(),
            locale: "en-US".to_string(),
        }
    }
}

/// Speech synthesis options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub rate: f32,
    pub pitch: f32,
    /// Preferred platform voice. Engines that do not know it use their default.
    pub voice_hint: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.2,
            voice_hint: "com.apple.voice.premium.en-US.Samantha".to_string(),
        }
    }
}

/// Weather provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Current-conditions endpoint (OpenWeatherMap compatible).
    pub endpoint: String,
    /// Unit system requested from the provider.
    pub units: String,
    /// Inline API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Upper bound on a single fetch, in seconds.
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            units: "imperial".to_string(),
            api_key: None,
            api_key_env: "PARLEY_WEATHER_API_KEY".to_string(),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    /// Fetch timeout. Never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Resolve the API key: inline value first, then the configured env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Conversation history settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of entries kept in the conversation log. Unbounded when unset.
    pub max_entries: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ParleyConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.user.name, "Luke Abel");
        assert_eq!(config.user.city, "La Mirada");
        assert_eq!(config.user.locale, "en-US");
        assert_eq!(config.voice.rate, 0.9);
        assert_eq!(config.voice.pitch, 1.2);
        assert_eq!(config.weather.units, "imperial");
        assert_eq!(config.weather.timeout_secs, 10);
        assert!(config.history.max_entries.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[user]
name = "Ada"
city = "London"
locale = "en-GB"

[weather]
endpoint = "http://localhost:9000/weather"
timeout_secs = 3

[history]
max_entries = 50
"#;
        let file = create_temp_config(content);
        let config = ParleyConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.user.name, "Ada");
        assert_eq!(config.user.city, "London");
        assert_eq!(config.user.locale, "en-GB");
        assert_eq!(config.weather.endpoint, "http://localhost:9000/weather");
        assert_eq!(config.weather.timeout_secs, 3);
        assert_eq!(config.history.max_entries, Some(50));
    }

    #[test]
    fn test_weather_timeout_never_zero() {
        let mut weather = WeatherConfig::default();
        assert_eq!(weather.timeout(), Duration::from_secs(10));
        weather.timeout_secs = 0;
        assert_eq!(weather.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[user]
name = "Grace"
"#;
        let file = create_temp_config(content);
        let config = ParleyConfig::load(file.path()).unwrap();
        assert_eq!(config.user.name, "Grace");
        // Remaining fields use defaults
        assert_eq!(config.user.city, "La Mirada");
        assert_eq!(config.weather.units, "imperial");
        assert_eq!(config.voice.rate, 0.9);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let file = create_temp_config("[user\nname = ");
        let result = ParleyConfig::load(file.path());
        assert!(matches!(result, Err(ParleyError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ParleyConfig::load_or_default(Path::new("/nonexistent/parley.toml"));
        assert_eq!(config.user.name, "Luke Abel");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ParleyConfig::default();
        config.user.city = "Lisbon".to_string();
        config.history.max_entries = Some(10);
        config.save(&path).unwrap();

        let reloaded = ParleyConfig::load(&path).unwrap();
        assert_eq!(reloaded.user.city, "Lisbon");
        assert_eq!(reloaded.history.max_entries, Some(10));
        assert_eq!(reloaded.voice.voice_hint, config.voice.voice_hint);
    }

    #[test]
    fn test_inline_api_key_wins() {
        let config = WeatherConfig {
            api_key: Some("inline-key".to_string()),
            api_key_env: "PARLEY_TEST_UNUSED_ENV_VAR".to_string(),
            ..WeatherConfig::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("inline-key"));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = WeatherConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "PARLEY_TEST_DEFINITELY_UNSET_VAR".to_string(),
            ..WeatherConfig::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
