//! Display fields for the country and weather panels.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::capabilities::icon_url;
use crate::config::Endpoints;
use crate::model::{Country, WeatherSnapshot};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyView {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDetails {
    pub name: String,
    pub capital: Option<String>,
    pub population: String,
    pub languages: Option<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub timezones: Option<String>,
    pub flag_url: Option<String>,
    pub currency: Option<CurrencyView>,
    pub calling_code: Option<String>,
}

fn join(items: &[String], separator: &str) -> Option<String> {
    (!items.is_empty()).then(|| items.join(separator))
}

impl CountryDetails {
    #[must_use]
    pub fn from_country(country: &Country) -> Self {
        Self {
            name: country.common_name.clone(),
            capital: join(&country.capitals, ","),
            population: format_population(country.population),
            languages: join(&country.languages, ", "),
            region: country.region.clone(),
            subregion: country.subregion.clone(),
            timezones: join(&country.timezones, ", "),
            flag_url: country.flag_url.clone(),
            currency: country
                .currency
                .as_ref()
                .filter(|c| c.name.is_some() || c.symbol.is_some())
                .map(|c| CurrencyView {
                    name: c.name.clone(),
                    symbol: c.symbol.clone(),
                }),
            calling_code: country.full_calling_code(),
        }
    }
}

/// Groups thousands with `.` the way the `es-ES` locale does: four-digit
/// numbers stay ungrouped, so `1234` but `12.345`.
#[must_use]
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    if digits.len() <= 4 {
        return digits;
    }

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_celsius: f64,
    /// Description with its first letter capitalized.
    pub description: String,
    pub raw_description: String,
    pub icon_url: Option<String>,
}

impl WeatherReport {
    #[must_use]
    pub fn from_snapshot(snapshot: &WeatherSnapshot, endpoints: &Endpoints) -> Self {
        let icon_url = match icon_url(endpoints, &snapshot.icon_id) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(icon = %snapshot.icon_id, error = %e, "unusable weather icon id");
                None
            }
        };

        Self {
            temperature_celsius: snapshot.temperature_celsius,
            description: capitalize_first(&snapshot.description),
            raw_description: snapshot.description.clone(),
            icon_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallingCode, Currency};

    #[test]
    fn population_grouping_matches_es_locale() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1234), "1234");
        assert_eq!(format_population(12_345), "12.345");
        assert_eq!(format_population(123_456), "123.456");
        assert_eq!(format_population(67_391_582), "67.391.582");
        assert_eq!(format_population(1_402_112_000), "1.402.112.000");
    }

    #[test]
    fn capitalizes_only_first_letter() {
        assert_eq!(capitalize_first("clear sky"), "Clear sky");
        assert_eq!(capitalize_first("überfall"), "Überfall");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn derives_country_fields() {
        let country = Country {
            common_name: "France".into(),
            calling_code: Some(CallingCode {
                root: "+3".into(),
                first_suffix: Some("3".into()),
            }),
            capitals: vec!["Paris".into()],
            population: 67_391_582,
            languages: vec!["French".into()],
            region: Some("Europe".into()),
            subregion: Some("Western Europe".into()),
            timezones: vec!["UTC-10:00".into(), "UTC+01:00".into()],
            flag_url: Some("https://flagcdn.com/w320/fr.png".into()),
            currency: Some(Currency {
                name: Some("Euro".into()),
                symbol: Some("€".into()),
            }),
        };

        let details = CountryDetails::from_country(&country);
        assert_eq!(details.capital.as_deref(), Some("Paris"));
        assert_eq!(details.population, "67.391.582");
        assert_eq!(details.languages.as_deref(), Some("French"));
        assert_eq!(details.timezones.as_deref(), Some("UTC-10:00, UTC+01:00"));
        assert_eq!(details.calling_code.as_deref(), Some("+33"));
        assert_eq!(details.currency.unwrap().symbol.as_deref(), Some("€"));
    }

    #[test]
    fn empty_lists_become_absent() {
        let country = Country {
            common_name: "Nowhere".into(),
            calling_code: None,
            capitals: Vec::new(),
            population: 0,
            languages: Vec::new(),
            region: None,
            subregion: None,
            timezones: Vec::new(),
            flag_url: None,
            currency: Some(Currency {
                name: None,
                symbol: None,
            }),
        };
        let details = CountryDetails::from_country(&country);
        assert_eq!(details.languages, None);
        assert_eq!(details.timezones, None);
        assert_eq!(details.currency, None);
        assert_eq!(details.calling_code, None);
        assert_eq!(details.capital, None);
    }

    #[test]
    fn every_capital_is_listed() {
        let country = Country {
            common_name: "South Africa".into(),
            calling_code: Some(CallingCode {
                root: "+2".into(),
                first_suffix: Some("7".into()),
            }),
            capitals: vec!["Pretoria".into(), "Bloemfontein".into(), "Cape Town".into()],
            population: 59_308_690,
            languages: vec!["Afrikaans".into(), "English".into()],
            region: Some("Africa".into()),
            subregion: Some("Southern Africa".into()),
            timezones: vec!["UTC+02:00".into()],
            flag_url: None,
            currency: None,
        };

        let details = CountryDetails::from_country(&country);
        assert_eq!(details.capital.as_deref(), Some("Pretoria,Bloemfontein,Cape Town"));
        assert_eq!(details.languages.as_deref(), Some("Afrikaans, English"));
        assert_eq!(country.primary_capital(), Some("Pretoria"));
    }

    #[test]
    fn weather_report_builds_icon_url() {
        let snapshot = WeatherSnapshot {
            temperature_celsius: 18.5,
            description: "light rain".into(),
            icon_id: "10d".into(),
        };
        let report = WeatherReport::from_snapshot(&snapshot, &Endpoints::default());
        assert_eq!(report.description, "Light rain");
        assert_eq!(report.raw_description, "light rain");
        assert_eq!(
            report.icon_url.as_deref(),
            Some("https://openweathermap.org/img/wn/10d.png")
        );
    }
}
