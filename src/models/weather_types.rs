use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Copy, Clone)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Foggy,
    Windy,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 7] = [
        WeatherCondition::Sunny,
        WeatherCondition::Cloudy,
        WeatherCondition::Rainy,
        WeatherCondition::Stormy,
        WeatherCondition::Snowy,
        WeatherCondition::Foggy,
        WeatherCondition::Windy,
    ];
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeatherReading {
    pub city: String,
    pub timestamp: String,
    pub temperature: f64,
    pub humidity: i32,
    pub wind_speed: f64,
    pub condition: WeatherCondition,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: WeatherCondition,
    pub precipitation: i32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBundle {
    pub city: String,
    pub generated_at: String,
    pub forecast: Vec<ForecastDay>,
}
