use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::RangeConfig;
use crate::models::assembler::{WeatherAssembler, WeatherSourceHandle};
use crate::routes;

// Anything that goes in here must be a handle or pointer that can be cloned.
// The underlying state itself should be shared.
#[derive(Clone)]
pub struct AppState {
    pub weather: WeatherSourceHandle,
}

pub fn create_weather_source(config: RangeConfig) -> WeatherSourceHandle {
    log::info!(
        "Generating weather for {} ({}, {}) with a {} day forecast",
        config.city.name,
        config.city.country,
        config.city.timezone,
        config.forecast.days
    );
    Arc::new(WeatherAssembler::new(Arc::new(config)))
}

pub fn create_app(weather: WeatherSourceHandle) -> Router {
    let state = AppState { weather };

    Router::new()
        .nest("/api/weather", routes::weather::routes(state))
        .layer(TraceLayer::new_for_http())
}
