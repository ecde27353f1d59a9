use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration format: {source}")]
    DecodingError {
        #[from]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CityConfig {
    pub name: String,
    pub country: String,
    pub timezone: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TemperatureConfig {
    pub min: f64,
    pub max: f64,
    pub forecast_min: f64,
    pub forecast_max: f64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PercentageRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    pub days: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FormatConfig {
    /// strftime pattern for timestamps, e.g. `%Y-%m-%dT%H:%M:%S`.
    pub timestamp: String,
    /// strftime pattern for forecast dates, e.g. `%Y-%m-%d`.
    pub date: String,
    pub decimal_places: u32,
}

/// Ranges and formats the weather generator draws from.
///
/// Built once at startup and shared read-only between requests.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RangeConfig {
    pub city: CityConfig,
    pub temperature: TemperatureConfig,
    pub humidity: PercentageRange,
    pub wind_speed: SpeedRange,
    pub precipitation: PercentageRange,
    pub forecast: ForecastConfig,
    pub format: FormatConfig,
}

/// Above this f64 no longer carries the requested fractional digits.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Rounds half up to `decimal_places` fractional digits.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places.min(MAX_DECIMAL_PLACES) as i32);
    (value * factor + 0.5).floor() / factor
}

/// Returns the parsed items of a strftime pattern, or `None` if the pattern
/// contains an unknown specifier.
pub fn parse_pattern(pattern: &str) -> Option<Vec<Item<'_>>> {
    let items: Vec<Item> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        None
    } else {
        Some(items)
    }
}

impl RangeConfig {
    pub fn load(file_path: impl AsRef<Path>) -> Result<RangeConfig, ConfigError> {
        let file_path = file_path.as_ref();
        let contents = read_to_string(file_path).map_err(|source| ConfigError::IoError {
            path: file_path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        log::debug!("Loaded weather configuration from {}", file_path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<RangeConfig, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Checks the ranges and patterns so that a bad file is rejected at
    /// startup instead of on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.city.name.trim().is_empty() {
            return Err(ConfigError::Invalid("city.name must not be empty".into()));
        }
        if self.format.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::Invalid(format!(
                "format.decimal_places ({}) must not exceed {MAX_DECIMAL_PLACES}",
                self.format.decimal_places
            )));
        }
        check_float_range("temperature", self.temperature.min, self.temperature.max)?;
        check_float_range(
            "temperature.forecast",
            self.temperature.forecast_min,
            self.temperature.forecast_max,
        )?;
        // A forecast minimum can round up to round_to(forecast_max), and the
        // maximum is drawn from [minimum, temperature.max).
        let highest_forecast_min =
            round_to(self.temperature.forecast_max, self.format.decimal_places);
        if highest_forecast_min >= self.temperature.max {
            return Err(ConfigError::Invalid(format!(
                "temperature.forecast_max ({}) rounds to {highest_forecast_min}, \
                 which must be below temperature.max ({})",
                self.temperature.forecast_max, self.temperature.max
            )));
        }
        check_float_range("wind_speed", self.wind_speed.min, self.wind_speed.max)?;
        check_int_range("humidity", self.humidity)?;
        check_int_range("precipitation", self.precipitation)?;
        if self.forecast.days == 0 {
            return Err(ConfigError::Invalid("forecast.days must be at least 1".into()));
        }
        if parse_pattern(&self.format.timestamp).is_none() {
            return Err(ConfigError::Invalid(format!(
                "format.timestamp is not a valid pattern: {}",
                self.format.timestamp
            )));
        }
        if parse_pattern(&self.format.date).is_none() {
            return Err(ConfigError::Invalid(format!(
                "format.date is not a valid pattern: {}",
                self.format.date
            )));
        }
        Ok(())
    }
}

fn check_float_range(name: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    // NaN bounds compare as None and are rejected too.
    if min.partial_cmp(&max) != Some(Ordering::Less) {
        return Err(ConfigError::Invalid(format!(
            "{name} range is empty: min {min} must be below max {max}"
        )));
    }
    Ok(())
}

fn check_int_range(name: &str, range: PercentageRange) -> Result<(), ConfigError> {
    if range.min > range.max {
        return Err(ConfigError::Invalid(format!(
            "{name} range is empty: min {} is above max {}",
            range.min, range.max
        )));
    }
    Ok(())
}
