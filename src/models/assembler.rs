use crate::config::RangeConfig;
use crate::error::WeatherError;
use crate::models::sampler::WeatherSampler;
use crate::models::weather_types::{CurrentWeatherReading, ForecastBundle, ForecastDay};
use std::sync::Arc;

/// Anything that can answer the two weather queries.
pub trait WeatherSource: Send + Sync {
    fn current_weather(&self) -> Result<CurrentWeatherReading, WeatherError>;
    fn forecast(&self) -> Result<ForecastBundle, WeatherError>;
}

pub type WeatherSourceHandle = Arc<dyn WeatherSource>;

/// Builds weather responses out of freshly sampled values.
#[derive(Debug, Clone)]
pub struct WeatherAssembler {
    sampler: WeatherSampler,
    config: Arc<RangeConfig>,
}

impl WeatherAssembler {
    pub fn new(config: Arc<RangeConfig>) -> WeatherAssembler {
        WeatherAssembler {
            sampler: WeatherSampler::new(config.clone()),
            config,
        }
    }

    fn city_name(&self) -> Result<String, WeatherError> {
        let name = &self.config.city.name;
        if name.trim().is_empty() {
            return Err(WeatherError::MissingData("city.name is not set".to_string()));
        }
        Ok(name.clone())
    }

    fn forecast_day(&self, date: String) -> Result<ForecastDay, WeatherError> {
        let temp_min = self.sampler.sample_forecast_temp_min()?;
        let temp_max = self.sampler.sample_forecast_temp_max(temp_min)?;
        Ok(ForecastDay {
            date,
            temp_min,
            temp_max,
            condition: self.sampler.sample_condition(),
            precipitation: self.sampler.sample_precipitation()?,
        })
    }
}

impl WeatherSource for WeatherAssembler {
    fn current_weather(&self) -> Result<CurrentWeatherReading, WeatherError> {
        Ok(CurrentWeatherReading {
            city: self.city_name()?,
            timestamp: self.sampler.current_timestamp()?,
            temperature: self.sampler.sample_temperature()?,
            humidity: self.sampler.sample_humidity()?,
            wind_speed: self.sampler.sample_wind_speed()?,
            condition: self.sampler.sample_condition(),
        })
    }

    fn forecast(&self) -> Result<ForecastBundle, WeatherError> {
        let city = self.city_name()?;
        let forecast = self
            .sampler
            .forecast_dates()?
            .into_iter()
            .map(|date| self.forecast_day(date))
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("Generated {} forecast days for {}", forecast.len(), city);
        Ok(ForecastBundle {
            city,
            generated_at: self.sampler.current_timestamp()?,
            forecast,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::test::test_config;
    use chrono::{Days, Local, NaiveDate};

    fn assembler() -> WeatherAssembler {
        WeatherAssembler::new(Arc::new(test_config()))
    }

    #[test]
    fn test_current_weather() {
        let reading = assembler().current_weather().unwrap();
        assert_eq!(reading.city, "Windholm");
        assert!(!reading.timestamp.is_empty());
        assert!((-15.0..=35.0).contains(&reading.temperature));
        assert!((20..=100).contains(&reading.humidity));
        assert!((0.0..=50.0).contains(&reading.wind_speed));
    }

    #[test]
    fn test_forecast_has_configured_days_in_order() {
        let bundle = assembler().forecast().unwrap();
        assert_eq!(bundle.city, "Windholm");
        assert!(!bundle.generated_at.is_empty());
        assert_eq!(bundle.forecast.len(), 7);

        let tomorrow = Local::now().date_naive() + Days::new(1);
        let dates: Vec<NaiveDate> = bundle
            .forecast
            .iter()
            .map(|day| NaiveDate::parse_from_str(&day.date, "%Y-%m-%d").unwrap())
            .collect();
        assert_eq!(dates[0], tomorrow);
        for pair in dates.windows(2) {
            assert_eq!(pair[1], pair[0] + Days::new(1));
        }
    }

    #[test]
    fn test_forecast_temp_max_never_below_min() {
        let assembler = assembler();
        for _ in 0..200 {
            for day in assembler.forecast().unwrap().forecast {
                assert!(
                    day.temp_max >= day.temp_min,
                    "{}: {} < {}",
                    day.date,
                    day.temp_max,
                    day.temp_min
                );
                assert!((0..=100).contains(&day.precipitation));
            }
        }
    }

    #[test]
    fn test_forecast_length_follows_config() {
        let mut config = test_config();
        config.forecast.days = 3;
        let bundle = WeatherAssembler::new(Arc::new(config)).forecast().unwrap();
        assert_eq!(bundle.forecast.len(), 3);
    }

    #[test]
    fn test_forecast_tight_temperature_range() {
        let mut config = test_config();
        config.temperature.forecast_min = 10.0;
        config.temperature.forecast_max = 10.04;
        config.temperature.max = 10.5;
        let bundle = WeatherAssembler::new(Arc::new(config)).forecast().unwrap();
        for day in bundle.forecast {
            assert_eq!(day.temp_min, 10.0);
            assert!(day.temp_max >= 10.0 && day.temp_max <= 10.5);
        }
    }

    #[test]
    fn test_validated_config_near_max_always_forecasts() {
        let mut config = test_config();
        config.temperature.forecast_min = 34.8;
        config.temperature.forecast_max = 34.94;
        config.temperature.max = 35.0;
        config.validate().expect("configuration should be valid");
        let assembler = WeatherAssembler::new(Arc::new(config));
        for _ in 0..100 {
            for day in assembler.forecast().unwrap().forecast {
                assert!(day.temp_min <= 34.9);
                assert!(day.temp_max >= day.temp_min && day.temp_max <= 35.0);
            }
        }
    }

    #[test]
    fn test_too_many_decimal_places_fails_instead_of_nan() {
        let mut config = test_config();
        config.format.decimal_places = 400;
        let assembler = WeatherAssembler::new(Arc::new(config));
        assert!(matches!(
            assembler.current_weather(),
            Err(WeatherError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_city_is_missing_data() {
        let mut config = test_config();
        config.city.name = String::new();
        let assembler = WeatherAssembler::new(Arc::new(config));
        assert!(matches!(
            assembler.current_weather(),
            Err(WeatherError::MissingData(_))
        ));
        assert!(matches!(
            assembler.forecast(),
            Err(WeatherError::MissingData(_))
        ));
    }

    #[test]
    fn test_bad_range_propagates() {
        let mut config = test_config();
        config.temperature.forecast_min = 30.0;
        config.temperature.forecast_max = 20.0;
        let assembler = WeatherAssembler::new(Arc::new(config));
        assert!(matches!(
            assembler.forecast(),
            Err(WeatherError::InvalidArgument(_))
        ));
    }
}
