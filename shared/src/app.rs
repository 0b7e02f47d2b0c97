use tracing::{debug, info, warn};

use crate::capabilities::{self, Capabilities};
use crate::config::{ConfigError, WidgetConfig};
use crate::detail::{CountryDetails, WeatherReport};
use crate::event::Event;
use crate::filter;
use crate::model::{Country, Model, NoticeSource, RequestSeq, SuggestionPanel, WeatherSnapshot};
use crate::selection::{self, Transition};
use crate::view::ViewModel;
use crate::{AppError, ErrorKind, FetchError};

#[derive(Default)]
pub struct App;

impl App {
    fn configure(config: Result<WidgetConfig, ConfigError>, model: &mut Model) {
        match config {
            Ok(config) => {
                let (endpoints, key) = config.into_parts();
                model.endpoints = endpoints;
                model.weather_api_key = Some(key);
                model.settle(NoticeSource::Configuration);
                info!(catalog = model.endpoints.catalog_base(), "widget configured");
            }
            Err(e) => {
                warn!(error = %e, "rejected widget configuration");
                model.weather_api_key = None;
                model.raise(NoticeSource::Configuration, e.into());
            }
        }
    }

    fn search(value: String, model: &mut Model, caps: &Capabilities) {
        model.input_value = value;
        // Bumped even for an empty term so an in-flight fetch cannot reopen the panel.
        let seq = model.catalog_seq.advance();

        if model.input_value.trim().is_empty() {
            model.replace_panel(SuggestionPanel::Hidden);
            return;
        }

        if let Err(e) = capabilities::fetch_catalog(&caps.http, &model.endpoints, seq) {
            warn!(error = %e, "cannot request country catalog");
            model.replace_panel(SuggestionPanel::Hidden);
            model.raise(NoticeSource::Suggestions, e.into());
        }
    }

    fn show_suggestions(result: Result<Vec<Country>, FetchError>, model: &mut Model) {
        match result {
            Ok(catalog) => {
                let term = model.input_value.trim();
                let entries = filter::apply(term, &catalog);
                debug!(
                    term,
                    catalog = catalog.len(),
                    matches = entries.len(),
                    "suggestions filtered"
                );

                let panel = if entries.is_empty() {
                    SuggestionPanel::NoResults
                } else {
                    SuggestionPanel::Entries(entries)
                };
                model.replace_panel(panel);
                model.settle(NoticeSource::Suggestions);
            }
            Err(e) => {
                warn!(error = %e, "error fetching country catalog");
                model.replace_panel(SuggestionPanel::Hidden);
                model.raise(NoticeSource::Suggestions, e.into());
            }
        }
    }

    /// Shared by clicks and Enter.
    fn commit_suggestion(index: usize, model: &mut Model, caps: &Capabilities) {
        let Some(name) = model
            .panel
            .entries()
            .get(index)
            .map(|e| e.display_text.clone())
        else {
            warn!(index, "commit for a suggestion that is not displayed");
            model.raise(
                NoticeSource::Suggestions,
                AppError::new(ErrorKind::InvalidState, format!("no suggestion at index {index}")),
            );
            return;
        };

        info!(country = %name, "suggestion committed");
        model.input_value.clone_from(&name);
        model.replace_panel(SuggestionPanel::Hidden);
        model.catalog_seq.advance();
        let seq = model.detail_seq.advance();

        if let Err(e) = capabilities::fetch_country_by_name(&caps.http, &model.endpoints, &name, seq)
        {
            warn!(error = %e, "cannot request country detail");
            model.raise(NoticeSource::Country, e.into());
        }
    }

    fn show_country(
        result: Result<Box<Country>, FetchError>,
        seq: RequestSeq,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        let country = match result {
            Ok(country) => country,
            Err(e) => {
                warn!(error = %e, "error fetching country data");
                model.raise(NoticeSource::Country, e.into());
                return;
            }
        };

        model.country = Some(CountryDetails::from_country(&country));
        model.weather = None;
        model.settle(NoticeSource::Country);

        match country.primary_capital() {
            Some(capital) => Self::request_weather(capital, seq, model, caps),
            None => info!(country = %country.common_name, "no capital, skipping weather"),
        }
    }

    fn request_weather(capital: &str, seq: RequestSeq, model: &mut Model, caps: &Capabilities) {
        let Some(key) = &model.weather_api_key else {
            let e = ConfigError::MissingApiKey;
            warn!(error = %e, capital, "weather not requested");
            model.raise(NoticeSource::Configuration, e.into());
            return;
        };

        if let Err(e) = capabilities::fetch_weather(&caps.http, &model.endpoints, key, capital, seq) {
            warn!(error = %e, "cannot request weather");
            model.raise(NoticeSource::Weather, e.into());
        }
    }

    fn show_weather(result: Result<WeatherSnapshot, FetchError>, model: &mut Model) {
        match result {
            Ok(snapshot) => {
                model.weather = Some(WeatherReport::from_snapshot(&snapshot, &model.endpoints));
                model.settle(NoticeSource::Weather);
            }
            Err(e) => {
                warn!(error = %e, "error fetching weather data");
                model.raise(NoticeSource::Weather, e.into());
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Self::Event, model: &mut Self::Model, caps: &Self::Capabilities) {
        match event {
            Event::Configure(input) => Self::configure(WidgetConfig::try_from(input), model),

            Event::InputChanged { value } => Self::search(value, model, caps),

            Event::CatalogFetched { seq, result } => {
                if seq != model.catalog_seq {
                    debug!(seq = seq.0, latest = model.catalog_seq.0, "discarding stale catalog");
                    return;
                }
                Self::show_suggestions(result, model);
            }

            Event::KeyPressed { key, metrics } => match model.selection.transition(key) {
                Transition::Ignored => return,
                Transition::Highlighted(index) => {
                    let count = model.selection.len();
                    if let Some(offset) =
                        metrics.and_then(|m| selection::scroll_offset(index, count, m))
                    {
                        model.scroll_top = Some(offset);
                    }
                }
                Transition::Commit(index) => Self::commit_suggestion(index, model, caps),
            },

            Event::SuggestionClicked { index } => Self::commit_suggestion(index, model, caps),

            Event::CountryFetched { seq, result } => {
                if seq != model.detail_seq {
                    debug!(seq = seq.0, latest = model.detail_seq.0, "discarding stale country");
                    return;
                }
                Self::show_country(result, seq, model, caps);
            }

            Event::WeatherFetched { seq, result } => {
                if seq != model.detail_seq {
                    debug!(seq = seq.0, latest = model.detail_seq.0, "discarding stale weather");
                    return;
                }
                Self::show_weather(result, model);
            }

            Event::NoticeDismissed => model.notice = None,
        }

        caps.render.render();
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        ViewModel::from_model(model)
    }
}
