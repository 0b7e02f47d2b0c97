use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crux_http::Http;

use crate::catalog::{decode_catalog, CountryRecord};
use crate::config::Endpoints;
use crate::event::Event;
use crate::model::{Country, RequestSeq, WeatherSnapshot};
use crate::{CATALOG_FIELDS, WEATHER_UNITS};

pub type HttpCapability = Http<Event>;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("HTTP error {status}")]
    Status { status: u16 },

    #[error("invalid response: {reason}")]
    Decode { reason: String },

    #[error("no country matches '{name}'")]
    NotFound { name: String },

    #[error("cannot build request URL: {reason}")]
    InvalidUrl { reason: String },
}

impl FetchError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, FetchError::Status { status } if (400..500).contains(status))
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, FetchError::Status { status } if (500..600).contains(status))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct WeatherRecord {
    main: MainRecord,
    #[serde(default)]
    weather: Vec<ConditionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct MainRecord {
    temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ConditionRecord {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

fn parse_base(base: &str) -> Result<Url, FetchError> {
    Url::parse(base).map_err(|e| FetchError::InvalidUrl {
        reason: e.to_string(),
    })
}

fn with_segments(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = parse_base(base)?;
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl {
            reason: format!("'{base}' cannot carry a path"),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn catalog_url(endpoints: &Endpoints) -> Result<Url, FetchError> {
    let mut url = with_segments(endpoints.catalog_base(), &["all"])?;
    url.set_query(Some(&format!("fields={CATALOG_FIELDS}")));
    Ok(url)
}

pub fn country_url(endpoints: &Endpoints, name: &str) -> Result<Url, FetchError> {
    if name.trim().is_empty() {
        return Err(FetchError::InvalidUrl {
            reason: "country name cannot be empty".to_string(),
        });
    }
    with_segments(endpoints.catalog_base(), &["name", name])
}

pub fn weather_url(
    endpoints: &Endpoints,
    api_key: &SecretString,
    capital: &str,
) -> Result<Url, FetchError> {
    let mut url = parse_base(endpoints.weather())?;
    url.query_pairs_mut()
        .append_pair("q", capital)
        .append_pair("appid", api_key.expose_secret())
        .append_pair("units", WEATHER_UNITS);
    Ok(url)
}

/// Icon image for an OpenWeatherMap icon id such as `10d`.
pub fn icon_url(endpoints: &Endpoints, icon_id: &str) -> Result<String, FetchError> {
    if icon_id.is_empty() || !icon_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::InvalidUrl {
            reason: format!("invalid icon id '{icon_id}'"),
        });
    }
    let file = format!("{icon_id}.png");
    let url = with_segments(endpoints.icon_base(), &[file.as_str()])?;
    Ok(url.into())
}

/// Checks the status and parses a JSON body.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status { status });
    }
    serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        reason: format!("failed to parse JSON: {e}"),
    })
}

pub fn decode_catalog_body(status: u16, body: &[u8]) -> Result<Vec<Country>, FetchError> {
    decode_body::<Vec<Value>>(status, body).map(decode_catalog)
}

/// First record of a name search; an empty result or a 404 is `NotFound`.
pub fn decode_country_body(name: &str, status: u16, body: &[u8]) -> Result<Country, FetchError> {
    let not_found = || FetchError::NotFound {
        name: name.to_string(),
    };
    if status == 404 {
        return Err(not_found());
    }
    let first = decode_body::<Vec<Value>>(status, body)?
        .into_iter()
        .next()
        .ok_or_else(not_found)?;
    let record: CountryRecord =
        serde_json::from_value(first).map_err(|e| FetchError::Decode {
            reason: format!("malformed country record: {e}"),
        })?;
    Ok(record.into())
}

pub fn decode_weather_body(status: u16, body: &[u8]) -> Result<WeatherSnapshot, FetchError> {
    let record: WeatherRecord = decode_body(status, body)?;
    let condition = record
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Decode {
            reason: "weather conditions are empty".to_string(),
        })?;
    Ok(WeatherSnapshot {
        temperature_celsius: record.main.temp,
        description: condition.description,
        icon_id: condition.icon,
    })
}

fn read_response(
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
) -> Result<(u16, Vec<u8>), FetchError> {
    match result {
        Ok(mut response) => {
            let status: u16 = response.status().into();
            let body = response.take_body().unwrap_or_default();
            Ok((status, body))
        }
        Err(e) => Err(FetchError::Network {
            message: e.to_string(),
        }),
    }
}

pub fn fetch_catalog(
    http: &HttpCapability,
    endpoints: &Endpoints,
    seq: RequestSeq,
) -> Result<(), FetchError> {
    let url = catalog_url(endpoints)?;
    debug!(seq = seq.0, "fetching country catalog");

    http.get(url.as_str()).send(move |result| Event::CatalogFetched {
        seq,
        result: read_response(result).and_then(|(status, body)| decode_catalog_body(status, &body)),
    });
    Ok(())
}

pub fn fetch_country_by_name(
    http: &HttpCapability,
    endpoints: &Endpoints,
    name: &str,
    seq: RequestSeq,
) -> Result<(), FetchError> {
    let url = country_url(endpoints, name)?;
    debug!(seq = seq.0, country = name, "fetching country detail");

    let name = name.to_string();
    http.get(url.as_str()).send(move |result| Event::CountryFetched {
        seq,
        result: read_response(result)
            .and_then(|(status, body)| decode_country_body(&name, status, &body))
            .map(Box::new),
    });
    Ok(())
}

pub fn fetch_weather(
    http: &HttpCapability,
    endpoints: &Endpoints,
    api_key: &SecretString,
    capital: &str,
    seq: RequestSeq,
) -> Result<(), FetchError> {
    let url = weather_url(endpoints, api_key, capital)?;
    // The URL carries the key; log the capital only.
    debug!(seq = seq.0, capital, "fetching weather");

    http.get(url.as_str()).send(move |result| Event::WeatherFetched {
        seq,
        result: read_response(result).and_then(|(status, body)| decode_weather_body(status, &body)),
    });
    Ok(())
}
