//! Environmental and mapping result types.
//!
//! Structured success payloads returned by the maps/environment provider
//! adapters. These are the merged-context inputs to prompt assembly, so
//! everything here is serde-serializable.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How far ahead hourly air-quality data is available, in hours.
pub const AIR_QUALITY_HORIZON_HOURS: i64 = 96;

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Bounding box around a geocoded place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub northeast: Coordinates,
    pub southwest: Coordinates,
}

/// A geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub coordinates: Coordinates,
    /// Place type tags as reported by the geocoder ("locality", ...).
    #[serde(default)]
    pub place_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Viewport>,
}

impl GeoPoint {
    /// Whether the geocoded place is city-like (a locality or a second or
    /// third level administrative area).
    pub fn is_city(&self) -> bool {
        const CITY_LIKE: [&str; 3] = [
            "locality",
            "administrative_area_level_2",
            "administrative_area_level_3",
        ];
        self.place_types
            .iter()
            .any(|t| CITY_LIKE.contains(&t.as_str()))
    }
}

/// A half-open UTC time range, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Construct a window. `end` must be after `start`, and the window must
    /// end within the hourly forecast horizon.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidValue {
                field: "end".to_string(),
                reason: "end time must be after start time".to_string(),
            });
        }
        let hours_until_end = (end - Utc::now()).num_hours();
        if hours_until_end > AIR_QUALITY_HORIZON_HOURS {
            return Err(ValidationError::InvalidValue {
                field: "end".to_string(),
                reason: format!(
                    "window ends more than {} hours ahead",
                    AIR_QUALITY_HORIZON_HOURS
                ),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whole hours covered by the window.
    pub fn hours(&self) -> i64 {
        (self.end - self.start).num_seconds() / 3600
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Forecast for one part of the day (daytime or nighttime).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPartForecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_probability_percent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thunderstorm_probability_percent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover_percent: Option<i32>,
}

/// One day's weather forecast for a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like_min: Option<f64>,
    pub temperature_unit: String,
    pub daytime: DayPartForecast,
    pub nighttime: DayPartForecast,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
}

/// One sampled hour of the universal air-quality index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyAqi {
    /// Hour label in "HH:MM" form, UTC.
    pub hour: String,
    pub aqi: i64,
}

/// Hourly air quality over a requested window, reduced to a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualitySummary {
    pub average_aqi: i64,
    pub min_aqi: i64,
    pub max_aqi: i64,
    pub hourly: Vec<HourlyAqi>,
}

/// Level of one pollen type on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollenLevel {
    pub level: i32,
    pub category: String,
    pub in_season: bool,
}

/// An in-season plant contributing pollen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePlant {
    pub name: String,
    pub level: i32,
    pub plant_type: String,
}

/// Pollen forecast for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollenReport {
    pub day_offset: u8,
    pub overall_level: i32,
    /// Pollen type with the highest level, or "none".
    pub worst_type: String,
    pub types: BTreeMap<String, PollenLevel>,
    /// Highest-level in-season plants, strongest first.
    pub active_plants: Vec<ActivePlant>,
}

/// A venue near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
    pub rating: f64,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Mode of travel for route calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Walk,
    Drive,
    Bicycle,
    Transit,
}

impl TravelMode {
    /// Upstream wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walk => "WALK",
            TravelMode::Drive => "DRIVE",
            TravelMode::Bicycle => "BICYCLE",
            TravelMode::Transit => "TRANSIT",
        }
    }
}

impl std::str::FromStr for TravelMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WALK" => Ok(TravelMode::Walk),
            "DRIVE" => Ok(TravelMode::Drive),
            "BICYCLE" => Ok(TravelMode::Bicycle),
            "TRANSIT" => Ok(TravelMode::Transit),
            other => Err(ValidationError::InvalidValue {
                field: "travel_mode".to_string(),
                reason: format!("'{}' is not one of WALK, DRIVE, BICYCLE, TRANSIT", other),
            }),
        }
    }
}

/// Route between two addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub start_address: String,
    pub end_address: String,
    pub mode: TravelMode,
    pub duration_minutes: i64,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn city_like_place_types_are_recognized() {
        let city = GeoPoint {
            coordinates: Coordinates {
                latitude: 45.75,
                longitude: 21.23,
            },
            place_types: vec!["locality".to_string(), "political".to_string()],
            bounds: None,
        };
        assert!(city.is_city());

        let street = GeoPoint {
            place_types: vec!["route".to_string()],
            ..city.clone()
        };
        assert!(!street.is_city());
    }

    #[test]
    fn time_window_rejects_inverted_range() {
        let now = Utc::now();
        let err = TimeWindow::new(now, now - Duration::hours(1));
        assert!(matches!(err, Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn time_window_rejects_far_future() {
        let start = Utc::now() + Duration::hours(100);
        let err = TimeWindow::new(start, start + Duration::hours(2));
        assert!(matches!(err, Err(ValidationError::InvalidValue { .. })));
    }

    #[test]
    fn time_window_reports_covered_hours() {
        let start = Utc::now();
        let window = TimeWindow::new(start, start + Duration::hours(3)).unwrap();
        assert_eq!(window.hours(), 3);
        assert!(window.contains(start + Duration::minutes(90)));
    }

    #[test]
    fn travel_mode_parses_case_insensitively() {
        assert_eq!("walk".parse::<TravelMode>().unwrap(), TravelMode::Walk);
        assert!("FLY".parse::<TravelMode>().is_err());
    }
}
