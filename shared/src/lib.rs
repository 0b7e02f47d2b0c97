// lib.rs - Country lookup core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod event;
pub mod filter;
pub mod model;
pub mod selection;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use app::App;
pub use capabilities::{Capabilities, Effect, FetchError};
pub use config::{ConfigError, ConfigInput, Endpoints, WidgetConfig};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{Country, Model, SuggestionEntry, SuggestionPanel, WeatherSnapshot};
pub use selection::{NavigationKey, PanelMetrics, SelectionState};
pub use view::ViewModel;

pub const DEFAULT_CATALOG_BASE_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_WEATHER_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Fields requested from the catalog `all` endpoint; it refuses unfiltered requests.
pub const CATALOG_FIELDS: &str =
    "name,idd,capital,population,languages,region,subregion,timezones,flags,currencies";

pub const WEATHER_UNITS: &str = "metric";
pub const NO_RESULTS_TEXT: &str = "No results found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    NotFound,
    Upstream,
    Deserialization,
    Configuration,
    InvalidState,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Upstream => "UPSTREAM_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Upstream => ErrorSeverity::Transient,
            Self::NotFound | Self::Deserialization | Self::Configuration | Self::InvalidState => {
                ErrorSeverity::Permanent
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to reach the country service. Please check your connection.".into()
            }
            ErrorKind::NotFound => match self.context.get("country") {
                Some(name) => format!("No country named \"{name}\" was found."),
                None => "The requested country could not be found.".into(),
            },
            ErrorKind::Upstream => "The service returned an error. Please try again.".into(),
            ErrorKind::Deserialization => "The service sent data we could not read.".into(),
            ErrorKind::Configuration => format!("Weather is unavailable: {}.", self.message),
            ErrorKind::InvalidState => "That suggestion is no longer available.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        let kind = match &e {
            FetchError::Network { .. } | FetchError::InvalidUrl { .. } => ErrorKind::Network,
            FetchError::Status { .. } => ErrorKind::Upstream,
            FetchError::Decode { .. } => ErrorKind::Deserialization,
            FetchError::NotFound { .. } => ErrorKind::NotFound,
        };
        let mut err = AppError::new(kind, e.to_string());
        if e.is_client_error() {
            err.severity = ErrorSeverity::Permanent;
        } else if e.is_server_error() {
            err.severity = ErrorSeverity::Transient;
        }
        match e {
            FetchError::NotFound { name } => err.with_context("country", name),
            FetchError::Status { status } => err.with_context("http_status", status.to_string()),
            _ => err,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}
