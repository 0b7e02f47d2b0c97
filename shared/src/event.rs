use serde::{Deserialize, Serialize};

use crate::capabilities::FetchError;
use crate::config::ConfigInput;
use crate::model::{Country, RequestSeq, WeatherSnapshot};
use crate::selection::{NavigationKey, PanelMetrics};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // --- Shell → core ---
    Configure(ConfigInput),

    /// Raw value of the text input after a keystroke.
    InputChanged {
        value: String,
    },

    /// ArrowDown/ArrowUp/Enter in the input. Metrics are measured from the
    /// rendered panel and drive the scroll offset.
    KeyPressed {
        key: NavigationKey,
        metrics: Option<PanelMetrics>,
    },

    SuggestionClicked {
        index: usize,
    },

    NoticeDismissed,

    // --- Capability responses ---
    #[serde(skip)]
    CatalogFetched {
        seq: RequestSeq,
        result: Result<Vec<Country>, FetchError>,
    },

    #[serde(skip)]
    CountryFetched {
        seq: RequestSeq,
        result: Result<Box<Country>, FetchError>,
    },

    #[serde(skip)]
    WeatherFetched {
        seq: RequestSeq,
        result: Result<WeatherSnapshot, FetchError>,
    },
}
