//! Weather readings and short forecast (mocked)

use serde::{Deserialize, Serialize};

use super::ProviderError;

/// Rain chance (percent) from which a forecast day counts as rainy
pub const RAINY_DAY_CHANCE: u8 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub temp: f64,
    pub condition: String,
    /// Percent
    pub rain_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_id: String,
    /// °C
    pub temperature: f64,
    /// Percent
    pub humidity: f64,
    /// mm
    pub rainfall: f64,
    /// km/h
    pub wind_speed: f64,
    pub weather_condition: String,
    pub forecast: Vec<ForecastDay>,
    pub planting_advice: String,
}

impl WeatherReport {
    /// Forecast days with a rain chance at or above `threshold` percent
    pub fn rainy_days(&self, threshold: u8) -> impl Iterator<Item = &ForecastDay> {
        self.forecast.iter().filter(move |d| d.rain_chance >= threshold)
    }
}

#[axum::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, location_id: &str) -> Result<WeatherReport, ProviderError>;
}

#[derive(Debug, Default, Clone)]
pub struct MockWeatherProvider;

#[axum::async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn current(&self, location_id: &str) -> Result<WeatherReport, ProviderError> {
        if location_id.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("location_id is empty".to_string()));
        }

        let day = |day: &str, temp: f64, condition: &str, rain_chance: u8| ForecastDay {
            day: day.to_string(),
            temp,
            condition: condition.to_string(),
            rain_chance,
        };

        Ok(WeatherReport {
            location_id: location_id.to_string(),
            temperature: 25.5,
            humidity: 65.0,
            rainfall: 2.5,
            wind_speed: 8.2,
            weather_condition: "Partly Cloudy".to_string(),
            forecast: vec![
                day("Today", 25.0, "Partly Cloudy", 20),
                day("Tomorrow", 27.0, "Sunny", 5),
                day("Day 3", 23.0, "Rainy", 80),
            ],
            planting_advice: "Good conditions for watering. Avoid heavy activities during rain forecast."
                .to_string(),
        })
    }
}
