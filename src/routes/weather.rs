use crate::app::AppState;
use crate::error::ApiError;
use crate::models::weather_types::{CurrentWeatherReading, ForecastBundle};
use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    routing::get,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/current", get(get_current_weather))
        .route("/forecast", get(get_forecast))
        .with_state(state)
}

async fn get_current_weather(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<CurrentWeatherReading>, ApiError> {
    log::debug!("Generating current weather");
    let reading = state
        .weather
        .current_weather()
        .map_err(|error| ApiError::new(error, uri.path()))?;
    Ok(Json(reading))
}

async fn get_forecast(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<ForecastBundle>, ApiError> {
    log::debug!("Generating forecast");
    let bundle = state
        .weather
        .forecast()
        .map_err(|error| ApiError::new(error, uri.path()))?;
    Ok(Json(bundle))
}
