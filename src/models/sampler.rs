use crate::config::{MAX_DECIMAL_PLACES, RangeConfig, parse_pattern, round_to};
use crate::error::WeatherError;
use crate::models::weather_types::WeatherCondition;
use chrono::format::Item;
use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use std::fmt::{Display, Write};
use std::sync::Arc;

const INVALID_CONFIGURATION: &str = "Invalid weather data configuration";

/// Draws single random weather values from the configured ranges.
///
/// Every call takes a fresh handle to the thread-local generator, so one
/// sampler can be shared by any number of concurrent requests.
#[derive(Debug, Clone)]
pub struct WeatherSampler {
    config: Arc<RangeConfig>,
}

impl WeatherSampler {
    pub fn new(config: Arc<RangeConfig>) -> WeatherSampler {
        WeatherSampler { config }
    }

    pub fn sample_temperature(&self) -> Result<f64, WeatherError> {
        let temperature = &self.config.temperature;
        self.sample_rounded("temperature", temperature.min, temperature.max)
    }

    pub fn sample_humidity(&self) -> Result<i32, WeatherError> {
        let humidity = self.config.humidity;
        sample_inclusive("humidity", humidity.min, humidity.max)
    }

    pub fn sample_wind_speed(&self) -> Result<f64, WeatherError> {
        let wind_speed = self.config.wind_speed;
        self.sample_rounded("wind speed", wind_speed.min, wind_speed.max)
    }

    pub fn sample_condition(&self) -> WeatherCondition {
        let index = rand::rng().random_range(0..WeatherCondition::ALL.len());
        WeatherCondition::ALL[index]
    }

    pub fn sample_forecast_temp_min(&self) -> Result<f64, WeatherError> {
        let temperature = &self.config.temperature;
        self.sample_rounded(
            "forecast temperature",
            temperature.forecast_min,
            temperature.forecast_max,
        )
    }

    /// Draws a maximum temperature from `[temp_min, temperature.max)`.
    ///
    /// Using `temp_min` as the lower bound is what keeps a forecast day's
    /// maximum at or above its minimum.
    pub fn sample_forecast_temp_max(&self, temp_min: f64) -> Result<f64, WeatherError> {
        let temp_max = self.sample_rounded(
            "forecast maximum temperature",
            temp_min,
            self.config.temperature.max,
        )?;
        Ok(temp_max.max(temp_min))
    }

    pub fn sample_precipitation(&self) -> Result<i32, WeatherError> {
        let precipitation = self.config.precipitation;
        sample_inclusive("precipitation", precipitation.min, precipitation.max)
    }

    pub fn current_timestamp(&self) -> Result<String, WeatherError> {
        let pattern = &self.config.format.timestamp;
        let items = pattern_items(pattern)?;
        render(Local::now().format_with_items(items.iter()), pattern)
    }

    /// Dates of the forecast days, starting tomorrow.
    pub fn forecast_dates(&self) -> Result<Vec<String>, WeatherError> {
        self.forecast_dates_from(Local::now().date_naive())
    }

    pub fn forecast_dates_from(&self, today: NaiveDate) -> Result<Vec<String>, WeatherError> {
        let pattern = &self.config.format.date;
        let items = pattern_items(pattern)?;
        (1..=u64::from(self.config.forecast.days))
            .map(|offset| {
                let date = today.checked_add_days(Days::new(offset)).ok_or_else(|| {
                    WeatherError::InvalidArgument(format!(
                        "{INVALID_CONFIGURATION}: forecast date out of range"
                    ))
                })?;
                render(date.format_with_items(items.iter()), pattern)
            })
            .collect()
    }

    fn sample_rounded(&self, name: &str, min: f64, max: f64) -> Result<f64, WeatherError> {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(invalid_range(name, min, max));
        }
        let decimal_places = self.config.format.decimal_places;
        if decimal_places > MAX_DECIMAL_PLACES {
            return Err(WeatherError::InvalidArgument(format!(
                "{INVALID_CONFIGURATION}: {decimal_places} decimal places requested"
            )));
        }
        let value = rand::rng().random_range(min..max);
        Ok(round_to(value, decimal_places))
    }
}

fn sample_inclusive(name: &str, min: i32, max: i32) -> Result<i32, WeatherError> {
    if min > max {
        return Err(invalid_range(name, min, max));
    }
    Ok(rand::rng().random_range(min..=max))
}

fn invalid_range(name: &str, min: impl Display, max: impl Display) -> WeatherError {
    WeatherError::InvalidArgument(format!(
        "{INVALID_CONFIGURATION}: {name} range [{min}, {max}) is empty"
    ))
}

fn pattern_items(pattern: &str) -> Result<Vec<Item<'_>>, WeatherError> {
    parse_pattern(pattern).ok_or_else(|| {
        WeatherError::InvalidArgument(format!(
            "{INVALID_CONFIGURATION}: unknown format pattern {pattern}"
        ))
    })
}

fn render(formatted: impl Display, pattern: &str) -> Result<String, WeatherError> {
    let mut rendered = String::new();
    // The formatter fails when the pattern asks for fields the value lacks,
    // e.g. an hour on a plain date.
    write!(rendered, "{formatted}").map_err(|_| {
        WeatherError::Internal(format!("could not format value with pattern {pattern}"))
    })?;
    Ok(rendered)
}
