//! Wire format of the country catalog and its conversion into [`Country`].

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{CallingCode, Country, Currency};

#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    pub name: NameRecord,
    #[serde(default)]
    pub idd: Option<IddRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capital: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub population: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Map<String, Value>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezones: Vec<String>,
    #[serde(default)]
    pub flags: Option<FlagsRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currencies: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRecord {
    pub common: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IddRecord {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suffixes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlagsRecord {
    #[serde(default)]
    pub png: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CurrencyRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
}

/// Reads an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl From<CountryRecord> for Country {
    fn from(record: CountryRecord) -> Self {
        let calling_code = record.idd.and_then(|idd| {
            let root = idd.root?;
            Some(CallingCode {
                root,
                first_suffix: idd.suffixes.into_iter().next(),
            })
        });

        let languages = record
            .languages
            .into_iter()
            .filter_map(|(_, v)| v.as_str().map(str::to_owned))
            .collect();

        let currency = record
            .currencies
            .into_iter()
            .next()
            .and_then(|(_, v)| serde_json::from_value::<CurrencyRecord>(v).ok())
            .map(|c| Currency {
                name: non_empty(c.name),
                symbol: non_empty(c.symbol),
            });

        Country {
            common_name: record.name.common,
            calling_code,
            capitals: record
                .capital
                .into_iter()
                .filter(|c| !c.trim().is_empty())
                .collect(),
            population: record.population,
            languages,
            region: non_empty(record.region),
            subregion: non_empty(record.subregion),
            timezones: record.timezones,
            flag_url: non_empty(record.flags.and_then(|f| f.png)),
            currency,
        }
    }
}

/// Converts raw catalog entries, skipping any that are not country records.
#[must_use]
pub fn decode_catalog(values: Vec<Value>) -> Vec<Country> {
    let total = values.len();
    let countries: Vec<Country> = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<CountryRecord>(value) {
            Ok(record) => Some(Country::from(record)),
            Err(e) => {
                debug!(error = %e, "skipping malformed catalog record");
                None
            }
        })
        .collect();
    if countries.len() < total {
        debug!(total, kept = countries.len(), "catalog decoded with skipped records");
    }
    countries
}
