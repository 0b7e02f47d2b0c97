//! Widget configuration: service endpoints and the weather API key.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::{DEFAULT_CATALOG_BASE_URL, DEFAULT_WEATHER_ICON_BASE_URL, DEFAULT_WEATHER_URL};

pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";
pub const CATALOG_URL_ENV: &str = "COUNTRY_CATALOG_URL";
pub const WEATHER_URL_ENV: &str = "WEATHER_API_URL";
pub const ICON_URL_ENV: &str = "WEATHER_ICON_URL";

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("weather API key is missing (set {API_KEY_ENV} or pass it at startup)")]
    MissingApiKey,

    #[error("invalid {name} URL '{url}': {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },
}

/// Validated base URLs for the three remote services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    catalog_base: String,
    weather: String,
    icon_base: String,
}

impl Endpoints {
    pub fn new(
        catalog_base: impl Into<String>,
        weather: impl Into<String>,
        icon_base: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_base: validate_url("catalog", catalog_base.into())?,
            weather: validate_url("weather", weather.into())?,
            icon_base: validate_url("icon", icon_base.into())?,
        })
    }

    pub fn catalog_base(&self) -> &str {
        &self.catalog_base
    }

    pub fn weather(&self) -> &str {
        &self.weather
    }

    pub fn icon_base(&self) -> &str {
        &self.icon_base
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            catalog_base: DEFAULT_CATALOG_BASE_URL.to_string(),
            weather: DEFAULT_WEATHER_URL.to_string(),
            icon_base: DEFAULT_WEATHER_ICON_BASE_URL.to_string(),
        }
    }
}

fn validate_url(name: &str, url: String) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name: name.to_string(),
        url: url.clone(),
        reason,
    };

    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid(format!(
            "invalid scheme '{}', only 'http' and 'https' are allowed",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("URL must have a host".to_string()));
    }
    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(invalid("credentials in URL are not allowed".to_string()));
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Configuration as delivered by the shell. Debug output is redacted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInput {
    pub weather_api_key: String,
    #[serde(default)]
    pub catalog_base_url: Option<String>,
    #[serde(default)]
    pub weather_url: Option<String>,
    #[serde(default)]
    pub icon_base_url: Option<String>,
}

impl fmt::Debug for ConfigInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigInput")
            .field("weather_api_key", &"[REDACTED]")
            .field("catalog_base_url", &self.catalog_base_url)
            .field("weather_url", &self.weather_url)
            .field("icon_base_url", &self.icon_base_url)
            .finish()
    }
}

#[derive(Debug)]
pub struct WidgetConfig {
    endpoints: Endpoints,
    weather_api_key: SecretString,
}

impl WidgetConfig {
    /// Config with the public endpoints. Fails on a blank key.
    pub fn new(weather_api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = weather_api_key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            endpoints: Endpoints::default(),
            weather_api_key: SecretString::new(key.trim().to_string()),
        })
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Reads [`API_KEY_ENV`] and the optional endpoint overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        ConfigInput {
            weather_api_key: lookup(API_KEY_ENV).unwrap_or_default(),
            catalog_base_url: lookup(CATALOG_URL_ENV),
            weather_url: lookup(WEATHER_URL_ENV),
            icon_base_url: lookup(ICON_URL_ENV),
        }
        .try_into()
    }

    pub fn into_parts(self) -> (Endpoints, SecretString) {
        (self.endpoints, self.weather_api_key)
    }
}

impl TryFrom<ConfigInput> for WidgetConfig {
    type Error = ConfigError;

    fn try_from(input: ConfigInput) -> Result<Self, Self::Error> {
        let defaults = Endpoints::default();
        let endpoints = Endpoints::new(
            input
                .catalog_base_url
                .unwrap_or_else(|| defaults.catalog_base().to_string()),
            input
                .weather_url
                .unwrap_or_else(|| defaults.weather().to_string()),
            input
                .icon_base_url
                .unwrap_or_else(|| defaults.icon_base().to_string()),
        )?;
        Ok(Self::new(input.weather_api_key)?.with_endpoints(endpoints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn blank_key_fails_fast() {
        assert_eq!(WidgetConfig::new("").unwrap_err(), ConfigError::MissingApiKey);
        assert_eq!(WidgetConfig::new("   ").unwrap_err(), ConfigError::MissingApiKey);
    }

    #[test]
    fn missing_env_key_fails_fast() {
        let err = WidgetConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn env_lookup_uses_defaults() {
        let (endpoints, key) = WidgetConfig::from_lookup(lookup(&[(API_KEY_ENV, "abc123")]))
            .unwrap()
            .into_parts();
        assert_eq!(key.expose_secret(), "abc123");
        assert_eq!(endpoints, Endpoints::default());
    }

    #[test]
    fn env_lookup_applies_overrides() {
        let (endpoints, _) = WidgetConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "abc123"),
            (CATALOG_URL_ENV, "https://countries.example.com/v3.1/"),
        ]))
        .unwrap()
        .into_parts();
        assert_eq!(endpoints.catalog_base(), "https://countries.example.com/v3.1");
        assert_eq!(endpoints.weather(), DEFAULT_WEATHER_URL);
    }

    #[test]
    fn rejects_bad_urls() {
        let input = ConfigInput {
            weather_api_key: "k".into(),
            weather_url: Some("ftp://weather.example.com".into()),
            ..ConfigInput::default()
        };
        let err = WidgetConfig::try_from(input).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { ref name, .. } if name == "weather"));

        assert!(Endpoints::new("not a url", DEFAULT_WEATHER_URL, DEFAULT_WEATHER_ICON_BASE_URL).is_err());
        assert!(Endpoints::new(
            "https://user:pw@example.com",
            DEFAULT_WEATHER_URL,
            DEFAULT_WEATHER_ICON_BASE_URL
        )
        .is_err());
    }

    #[test]
    fn debug_output_hides_key() {
        let input = ConfigInput {
            weather_api_key: "super-secret".into(),
            ..ConfigInput::default()
        };
        assert!(!format!("{input:?}").contains("super-secret"));

        let config = WidgetConfig::new("super-secret").unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
