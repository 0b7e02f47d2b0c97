use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::Endpoints;
use crate::detail::{CountryDetails, WeatherReport};
use crate::selection::SelectionState;
use crate::AppError;

/// International dialing prefix: a root such as `+3` and its suffixes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallingCode {
    pub root: String,
    pub first_suffix: Option<String>,
}

impl CallingCode {
    /// Integer value of the leading digits of the root (`"+3"` is 3).
    #[must_use]
    pub fn numeric_root(&self) -> Option<i64> {
        let s = self.root.trim_start();
        let (negative, s) = match s.as_bytes().first() {
            Some(b'+') => (false, &s[1..]),
            Some(b'-') => (true, &s[1..]),
            _ => (false, s),
        };
        let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let value: i64 = s[..end].parse().ok()?;
        Some(if negative { -value } else { value })
    }

    /// Root plus first suffix, only when both exist.
    #[must_use]
    pub fn full(&self) -> Option<String> {
        if self.root.is_empty() {
            return None;
        }
        self.first_suffix
            .as_ref()
            .map(|suffix| format!("{}{suffix}", self.root))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub common_name: String,
    pub calling_code: Option<CallingCode>,
    pub capitals: Vec<String>,
    pub population: u64,
    pub languages: Vec<String>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub timezones: Vec<String>,
    pub flag_url: Option<String>,
    pub currency: Option<Currency>,
}

impl Country {
    #[must_use]
    pub fn numeric_root(&self) -> Option<i64> {
        self.calling_code.as_ref().and_then(CallingCode::numeric_root)
    }

    #[must_use]
    pub fn full_calling_code(&self) -> Option<String> {
        self.calling_code.as_ref().and_then(CallingCode::full)
    }

    /// First listed capital; the one weather is looked up for.
    #[must_use]
    pub fn primary_capital(&self) -> Option<&str> {
        self.capitals.first().map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub display_text: String,
    pub country: Country,
}

impl SuggestionEntry {
    #[must_use]
    pub fn from_country(country: &Country) -> Self {
        Self {
            display_text: country.common_name.to_lowercase(),
            country: country.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_celsius: f64,
    pub description: String,
    pub icon_id: String,
}

/// What the suggestion panel currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SuggestionPanel {
    #[default]
    Hidden,
    /// The "No results found" placeholder. Holds no selectable entries.
    NoResults,
    Entries(Vec<SuggestionEntry>),
}

impl SuggestionPanel {
    #[must_use]
    pub fn entries(&self) -> &[SuggestionEntry] {
        match self {
            Self::Entries(entries) => entries,
            Self::Hidden | Self::NoResults => &[],
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Monotonic request counter; only responses tagged with the latest value are applied.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestSeq(pub u64);

impl RequestSeq {
    /// Bumps the counter and returns the new latest value.
    pub fn advance(&mut self) -> Self {
        self.0 += 1;
        *self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeSource {
    Suggestions,
    Country,
    Weather,
    Configuration,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub source: NoticeSource,
    pub error: AppError,
}

#[derive(Debug, Default)]
pub struct Model {
    pub endpoints: Endpoints,
    pub weather_api_key: Option<SecretString>,

    pub input_value: String,
    pub panel: SuggestionPanel,
    pub selection: SelectionState,
    pub scroll_top: Option<f64>,

    pub country: Option<CountryDetails>,
    pub weather: Option<WeatherReport>,
    pub notice: Option<Notice>,

    pub catalog_seq: RequestSeq,
    pub detail_seq: RequestSeq,
}

impl Model {
    /// Installs a new panel together with a fresh selection.
    pub fn replace_panel(&mut self, panel: SuggestionPanel) {
        self.selection = SelectionState::new(panel.entries().len());
        self.scroll_top = None;
        self.panel = panel;
    }

    pub fn raise(&mut self, source: NoticeSource, error: AppError) {
        self.notice = Some(Notice { source, error });
    }

    /// Drops the notice if it was raised by `source`.
    pub fn settle(&mut self, source: NoticeSource) {
        if self.notice.as_ref().is_some_and(|n| n.source == source) {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(root: &str, suffix: Option<&str>) -> CallingCode {
        CallingCode {
            root: root.into(),
            first_suffix: suffix.map(Into::into),
        }
    }

    #[test]
    fn numeric_root_reads_leading_digits() {
        assert_eq!(code("+3", Some("3")).numeric_root(), Some(3));
        assert_eq!(code("+1", Some("268")).numeric_root(), Some(1));
        assert_eq!(code(" +44x", None).numeric_root(), Some(44));
        assert_eq!(code("", None).numeric_root(), None);
        assert_eq!(code("+", None).numeric_root(), None);
        assert_eq!(code("abc", None).numeric_root(), None);
    }

    #[test]
    fn full_code_needs_root_and_suffix() {
        assert_eq!(code("+3", Some("3")).full().as_deref(), Some("+33"));
        assert_eq!(code("+3", None).full(), None);
        assert_eq!(code("", Some("3")).full(), None);
    }

    #[test]
    fn replace_panel_resets_selection() {
        let mut model = Model::default();
        model.selection = SelectionState::new(3);
        model.scroll_top = Some(40.0);

        model.replace_panel(SuggestionPanel::NoResults);

        assert_eq!(model.selection, SelectionState::new(0));
        assert_eq!(model.selection.as_index(), -1);
        assert_eq!(model.scroll_top, None);
        assert!(model.panel.is_visible());
    }

    #[test]
    fn settle_only_clears_matching_source() {
        let mut model = Model::default();
        let err = AppError::new(crate::ErrorKind::Network, "down");
        model.raise(NoticeSource::Weather, err);

        model.settle(NoticeSource::Country);
        assert!(model.notice.is_some());

        model.settle(NoticeSource::Weather);
        assert!(model.notice.is_none());
    }

    #[test]
    fn request_seq_is_monotonic() {
        let mut seq = RequestSeq::default();
        let first = seq.advance();
        let second = seq.advance();
        assert!(second > first);
        assert_eq!(seq, second);
    }
}
