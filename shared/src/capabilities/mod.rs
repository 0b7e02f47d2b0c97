//! Capabilities the core uses to talk to its shell.
//!
//! We use Crux's built-in Render and Http capabilities directly; the request
//! builders and response decoding for the two public APIs live in `http`.

mod http;

pub use self::http::{
    catalog_url, country_url, decode_body, decode_catalog_body, decode_country_body,
    decode_weather_body, fetch_catalog, fetch_country_by_name, fetch_weather, icon_url,
    weather_url, FetchError, HttpCapability,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub http: Http<Event>,
    pub render: Render<Event>,
}
