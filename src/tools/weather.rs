//! Canned climate data for the Style Advisor

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub struct WeatherArgs {
    pub location: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Climate {
    pub current_temp: &'static str,
    pub conditions: &'static str,
    pub seasonal_range: &'static str,
    pub precipitation: &'static str,
}

const KNOWN_CLIMATES: [(&str, Climate); 3] = [
    (
        "boston",
        Climate {
            current_temp: "45°F",
            conditions: "Partly cloudy",
            seasonal_range: "15°F to 85°F",
            precipitation: "Moderate rainfall, winter snow",
        },
    ),
    (
        "miami",
        Climate {
            current_temp: "82°F",
            conditions: "Sunny",
            seasonal_range: "65°F to 90°F",
            precipitation: "Occasional heavy rain, humid",
        },
    ),
    (
        "seattle",
        Climate {
            current_temp: "52°F",
            conditions: "Light rain",
            seasonal_range: "35°F to 75°F",
            precipitation: "Frequent light rain, occasional snow",
        },
    ),
];

const DEFAULT_CLIMATE: Climate = Climate {
    current_temp: "65°F",
    conditions: "Variable",
    seasonal_range: "Varies by season",
    precipitation: "Varies throughout the year",
};

pub fn climate_for(location: &str) -> Climate {
    let key: String = location
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    KNOWN_CLIMATES
        .iter()
        .find(|(city, _)| key.contains(city))
        .map(|(_, climate)| *climate)
        .unwrap_or(DEFAULT_CLIMATE)
}

pub fn get_weather_information(args: &WeatherArgs) -> Value {
    let climate = climate_for(&args.location);
    json!({
        "location": args.location,
        "current_temp": climate.current_temp,
        "conditions": climate.conditions,
        "seasonal_range": climate.seasonal_range,
        "precipitation": climate.precipitation,
    })
}
