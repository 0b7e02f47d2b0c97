//! What the shell draws: the suggestion list, the two detail panels as
//! markup fragments, and an optional notice.

use serde::{Deserialize, Serialize};

use crate::detail::{CountryDetails, WeatherReport};
use crate::model::{Model, Notice, NoticeSource, SuggestionPanel};
use crate::{ErrorSeverity, NO_RESULTS_TEXT};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionItemView {
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionListView {
    pub visible: bool,
    pub items: Vec<SuggestionItemView>,
    /// Non-interactive text shown instead of items.
    pub placeholder: Option<String>,
}

impl SuggestionListView {
    fn build(panel: &SuggestionPanel, highlighted: Option<usize>) -> Self {
        match panel {
            SuggestionPanel::Hidden => Self::default(),
            SuggestionPanel::NoResults => Self {
                visible: true,
                items: Vec::new(),
                placeholder: Some(NO_RESULTS_TEXT.to_string()),
            },
            SuggestionPanel::Entries(entries) => Self {
                visible: true,
                items: entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| SuggestionItemView {
                        text: e.display_text.clone(),
                        selected: highlighted == Some(i),
                    })
                    .collect(),
                placeholder: None,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CountryPanelView {
    pub details: CountryDetails,
    pub markup: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeatherPanelView {
    pub report: WeatherReport,
    pub markup: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoticeView {
    pub source: NoticeSource,
    pub message: String,
    pub error_code: String,
    pub is_transient: bool,
}

impl From<&Notice> for NoticeView {
    fn from(n: &Notice) -> Self {
        Self {
            source: n.source,
            message: n.error.user_facing_message(),
            error_code: n.error.code().to_string(),
            is_transient: n.error.severity == ErrorSeverity::Transient,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub input_value: String,
    pub suggestions: SuggestionListView,
    /// `-1` when nothing is highlighted.
    pub selected_index: i64,
    /// Scroll the panel to this offset when set.
    pub scroll_top: Option<f64>,
    pub country: Option<CountryPanelView>,
    pub weather: Option<WeatherPanelView>,
    pub notice: Option<NoticeView>,
    pub weather_configured: bool,
}

impl ViewModel {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        Self {
            input_value: model.input_value.clone(),
            suggestions: SuggestionListView::build(&model.panel, model.selection.highlighted()),
            selected_index: model.selection.as_index(),
            scroll_top: model.scroll_top,
            country: model.country.as_ref().map(|details| CountryPanelView {
                markup: render_country(details),
                details: details.clone(),
            }),
            weather: model.weather.as_ref().map(|report| WeatherPanelView {
                markup: render_weather(report),
                report: report.clone(),
            }),
            notice: model.notice.as_ref().map(NoticeView::from),
            weather_configured: model.weather_api_key.is_some(),
        }
    }
}

#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn line(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("<p>{label}: {}</p>\n", escape_html(value)));
    }
}

/// Country panel markup. Absent fields render no line at all.
#[must_use]
pub fn render_country(details: &CountryDetails) -> String {
    let mut out = String::from("<h2>Country Information:</h2>\n");
    line(&mut out, "Capital", details.capital.as_deref());
    line(&mut out, "Population", Some(details.population.as_str()));
    line(&mut out, "Languages", details.languages.as_deref());
    line(&mut out, "Region", details.region.as_deref());
    line(&mut out, "Subregion", details.subregion.as_deref());
    line(&mut out, "Timezone", details.timezones.as_deref());

    if let Some(flag) = &details.flag_url {
        out.push_str(&format!(
            "<img id=\"countryFlag\" src=\"{}\" alt=\"Flag\">\n",
            escape_html(flag)
        ));
    }

    if let Some(currency) = &details.currency {
        out.push_str("<p id=\"currency\">Currency:");
        if let Some(name) = &currency.name {
            out.push(' ');
            out.push_str(&escape_html(name));
        }
        if let Some(symbol) = &currency.symbol {
            out.push_str(&format!(
                " <span id=\"currencySymbol\">{}</span>",
                escape_html(symbol)
            ));
        }
        out.push_str("</p>\n");
    }

    line(&mut out, "Prefix", details.calling_code.as_deref());
    out
}

#[must_use]
pub fn render_weather(report: &WeatherReport) -> String {
    let mut out = format!(
        "<p>{} °C | {}</p>\n",
        report.temperature_celsius,
        escape_html(&report.description)
    );
    if let Some(icon) = &report.icon_url {
        out.push_str(&format!(
            "<div class=\"weather-icon-container\">\n<img src=\"{}\" alt=\"Weather Icon - {}\">\n</div>\n",
            escape_html(icon),
            escape_html(&report.raw_description)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::CurrencyView;
    use crate::model::{CallingCode, Country, SuggestionEntry};

    fn paris() -> CountryDetails {
        CountryDetails {
            name: "France".into(),
            capital: Some("Paris".into()),
            population: "67.391.582".into(),
            languages: Some("French".into()),
            region: Some("Europe".into()),
            subregion: Some("Western Europe".into()),
            timezones: Some("UTC+01:00".into()),
            flag_url: Some("https://flagcdn.com/w320/fr.png".into()),
            currency: Some(CurrencyView {
                name: Some("Euro".into()),
                symbol: Some("€".into()),
            }),
            calling_code: Some("+33".into()),
        }
    }

    #[test]
    fn country_markup_has_every_line() {
        let html = render_country(&paris());
        assert!(html.starts_with("<h2>Country Information:</h2>"));
        assert!(html.contains("<p>Capital: Paris</p>"));
        assert!(html.contains("<p>Population: 67.391.582</p>"));
        assert!(html.contains("<p>Languages: French</p>"));
        assert!(html.contains("<p>Subregion: Western Europe</p>"));
        assert!(html.contains("<p>Timezone: UTC+01:00</p>"));
        assert!(html.contains(r#"<img id="countryFlag" src="https://flagcdn.com/w320/fr.png" alt="Flag">"#));
        assert!(html.contains(r#"<p id="currency">Currency: Euro <span id="currencySymbol">€</span></p>"#));
        assert!(html.contains("<p>Prefix: +33</p>"));
    }

    #[test]
    fn absent_fields_render_nothing() {
        let details = CountryDetails {
            subregion: None,
            currency: None,
            flag_url: None,
            calling_code: None,
            ..paris()
        };
        let html = render_country(&details);
        assert!(!html.contains("Subregion"));
        assert!(!html.contains("Currency"));
        assert!(!html.contains("countryFlag"));
        assert!(!html.contains("Prefix"));
        assert!(!html.contains("undefined"));
        assert!(html.contains("<p>Capital: Paris</p>"));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let details = CountryDetails {
            capital: Some("<script>alert(1)</script>".into()),
            ..paris()
        };
        let html = render_country(&details);
        assert!(html.contains("<p>Capital: &lt;script&gt;alert(1)&lt;/script&gt;</p>"));
    }

    #[test]
    fn weather_markup() {
        let report = WeatherReport {
            temperature_celsius: 18.5,
            description: "Clear sky".into(),
            raw_description: "clear sky".into(),
            icon_url: Some("https://openweathermap.org/img/wn/01d.png".into()),
        };
        let html = render_weather(&report);
        assert!(html.starts_with("<p>18.5 °C | Clear sky</p>"));
        assert!(html.contains(r#"alt="Weather Icon - clear sky""#));
        assert!(html.contains("weather-icon-container"));
    }

    #[test]
    fn whole_degrees_print_without_fraction() {
        let report = WeatherReport {
            temperature_celsius: 20.0,
            description: "Mist".into(),
            raw_description: "mist".into(),
            icon_url: None,
        };
        assert_eq!(render_weather(&report), "<p>20 °C | Mist</p>\n");
    }

    #[test]
    fn placeholder_is_not_an_item() {
        let view = SuggestionListView::build(&SuggestionPanel::NoResults, None);
        assert!(view.visible);
        assert!(view.items.is_empty());
        assert_eq!(view.placeholder.as_deref(), Some(NO_RESULTS_TEXT));
    }

    #[test]
    fn exactly_one_item_is_selected() {
        let country = |name: &str| Country {
            common_name: name.into(),
            calling_code: Some(CallingCode {
                root: "+3".into(),
                first_suffix: Some("3".into()),
            }),
            capitals: Vec::new(),
            population: 0,
            languages: Vec::new(),
            region: None,
            subregion: None,
            timezones: Vec::new(),
            flag_url: None,
            currency: None,
        };
        let panel = SuggestionPanel::Entries(vec![
            SuggestionEntry::from_country(&country("France")),
            SuggestionEntry::from_country(&country("Finland")),
        ]);
        let view = SuggestionListView::build(&panel, Some(1));
        let selected: Vec<bool> = view.items.iter().map(|i| i.selected).collect();
        assert_eq!(selected, [false, true]);
        assert_eq!(view.items[0].text, "france");
    }

    #[test]
    fn hidden_panel_is_empty() {
        let view = SuggestionListView::build(&SuggestionPanel::Hidden, None);
        assert_eq!(view, SuggestionListView::default());
        assert!(!view.visible);
    }
}
