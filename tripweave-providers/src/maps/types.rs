//! Maps/environment API request and response types.
//!
//! Wire shapes for the geocoding, weather, air-quality, pollen, places
//! and routes endpoints, with the reductions into domain types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tripweave_core::{
    ActivePlant, AirQualitySummary, Coordinates, DayPartForecast, GeoPoint, HourlyAqi,
    PollenLevel, PollenReport, TimeWindow, Venue, Viewport, WeatherReport,
};

// ============================================================================
// GEOCODING
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default)]
    pub bounds: Option<BoundsWire>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundsWire {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

impl From<LatLng> for Coordinates {
    fn from(value: LatLng) -> Self {
        Coordinates {
            latitude: value.lat,
            longitude: value.lng,
        }
    }
}

impl GeocodeResponse {
    /// First geocoding result as a domain point, or None when the address
    /// resolved to nothing.
    pub fn into_geo_point(self) -> Option<GeoPoint> {
        let result = self.results.into_iter().next()?;
        Some(GeoPoint {
            coordinates: result.geometry.location.into(),
            place_types: result.types,
            bounds: result.geometry.bounds.map(|b| Viewport {
                northeast: b.northeast.into(),
                southwest: b.southwest.into(),
            }),
        })
    }
}

// ============================================================================
// WEATHER
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    #[serde(default)]
    pub forecast_days: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    #[serde(default)]
    pub max_temperature: Option<Degrees>,
    #[serde(default)]
    pub min_temperature: Option<Degrees>,
    #[serde(default)]
    pub feels_like_max_temperature: Option<Degrees>,
    #[serde(default)]
    pub feels_like_min_temperature: Option<Degrees>,
    #[serde(default)]
    pub daytime_forecast: Option<DayPartWire>,
    #[serde(default)]
    pub nighttime_forecast: Option<DayPartWire>,
    #[serde(default)]
    pub sun_events: Option<SunEvents>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Degrees {
    #[serde(default)]
    pub degrees: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPartWire {
    #[serde(default)]
    pub weather_condition: Option<WeatherCondition>,
    #[serde(default)]
    pub relative_humidity: Option<i32>,
    #[serde(default)]
    pub uv_index: Option<i32>,
    #[serde(default)]
    pub precipitation: Option<PrecipitationWire>,
    #[serde(default)]
    pub thunderstorm_probability: Option<i32>,
    #[serde(default)]
    pub wind: Option<WindWire>,
    #[serde(default)]
    pub cloud_cover: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherCondition {
    #[serde(default, rename = "type")]
    pub condition_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrecipitationWire {
    #[serde(default)]
    pub probability: Option<PrecipProbability>,
    #[serde(default)]
    pub qpf: Option<Qpf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrecipProbability {
    #[serde(default)]
    pub percent: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qpf {
    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindWire {
    #[serde(default)]
    pub speed: Option<WindSpeed>,
    #[serde(default)]
    pub direction: Option<WindDirection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindSpeed {
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindDirection {
    #[serde(default)]
    pub cardinal: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunEvents {
    #[serde(default)]
    pub sunrise_time: Option<String>,
    #[serde(default)]
    pub sunset_time: Option<String>,
}

impl DayPartWire {
    fn into_forecast(self) -> DayPartForecast {
        let (precipitation_probability_percent, precipitation_amount) = match self.precipitation {
            Some(p) => (
                p.probability.and_then(|p| p.percent),
                p.qpf.and_then(|q| q.quantity),
            ),
            None => (None, None),
        };
        let (wind_speed, wind_direction) = match self.wind {
            Some(w) => (
                w.speed.and_then(|s| s.value),
                w.direction.and_then(|d| d.cardinal),
            ),
            None => (None, None),
        };
        DayPartForecast {
            condition: self.weather_condition.and_then(|c| c.condition_type),
            humidity_percent: self.relative_humidity,
            uv_index: self.uv_index,
            precipitation_probability_percent,
            precipitation_amount,
            thunderstorm_probability_percent: self.thunderstorm_probability,
            wind_speed,
            wind_direction,
            cloud_cover_percent: self.cloud_cover,
        }
    }
}

impl WeatherResponse {
    /// Extract the forecast for the requested day offset.
    pub fn report_for_day(self, day_offset: usize) -> Option<WeatherReport> {
        let day = self.forecast_days.into_iter().nth(day_offset)?;
        Some(WeatherReport {
            max_temperature: day.max_temperature.and_then(|d| d.degrees),
            min_temperature: day.min_temperature.and_then(|d| d.degrees),
            feels_like_max: day.feels_like_max_temperature.and_then(|d| d.degrees),
            feels_like_min: day.feels_like_min_temperature.and_then(|d| d.degrees),
            temperature_unit: "CELSIUS".to_string(),
            daytime: day
                .daytime_forecast
                .map(DayPartWire::into_forecast)
                .unwrap_or_default(),
            nighttime: day
                .nighttime_forecast
                .map(DayPartWire::into_forecast)
                .unwrap_or_default(),
            sunrise: day.sun_events.as_ref().and_then(|s| s.sunrise_time.clone()),
            sunset: day.sun_events.and_then(|s| s.sunset_time),
        })
    }
}

// ============================================================================
// AIR QUALITY
// ============================================================================

/// Index code of the universal AQI in forecast responses.
const UNIVERSAL_AQI: &str = "uaqi";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityRequest {
    pub location: LatLngObject,
    pub period: ForecastPeriod,
    pub page_size: i64,
    pub extra_computations: Vec<String>,
    pub language_code: String,
    pub universal_aqi: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LatLngObject {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for LatLngObject {
    fn from(value: Coordinates) -> Self {
        LatLngObject {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityResponse {
    #[serde(default)]
    pub hourly_forecasts: Vec<HourlyForecast>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    #[serde(default)]
    pub date_time: String,
    #[serde(default)]
    pub indexes: Vec<AqiIndex>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AqiIndex {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub aqi: i64,
}

impl AirQualityResponse {
    /// Restrict the hourly series to `window` and reduce it to a summary.
    /// Returns None when no usable hour falls inside the window.
    pub fn summarize(self, window: &TimeWindow) -> Option<AirQualitySummary> {
        let mut hourly = Vec::new();
        for forecast in self.hourly_forecasts {
            let Ok(instant) = forecast.date_time.parse::<chrono::DateTime<chrono::Utc>>()
            else {
                continue;
            };
            if !window.contains(instant) {
                continue;
            }
            let Some(index) = forecast.indexes.iter().find(|i| i.code == UNIVERSAL_AQI)
            else {
                continue;
            };
            hourly.push(HourlyAqi {
                hour: instant.format("%H:%M").to_string(),
                aqi: index.aqi,
            });
        }

        if hourly.is_empty() {
            return None;
        }

        let values: Vec<i64> = hourly.iter().map(|h| h.aqi).collect();
        let sum: i64 = values.iter().sum();
        let average = (sum as f64 / values.len() as f64).round() as i64;
        Some(AirQualitySummary {
            average_aqi: average,
            min_aqi: values.iter().copied().min().unwrap_or_default(),
            max_aqi: values.iter().copied().max().unwrap_or_default(),
            hourly,
        })
    }
}

// ============================================================================
// POLLEN
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollenResponse {
    #[serde(default)]
    pub daily_info: Vec<DailyPollen>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPollen {
    #[serde(default)]
    pub pollen_type_info: Vec<PollenTypeInfo>,
    #[serde(default)]
    pub plant_info: Vec<PlantInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollenTypeInfo {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub in_season: bool,
    #[serde(default)]
    pub index_info: Option<IndexInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexInfo {
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantInfo {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub in_season: bool,
    #[serde(default)]
    pub index_info: Option<IndexInfo>,
    #[serde(default)]
    pub plant_description: Option<PlantDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantDescription {
    #[serde(default, rename = "type")]
    pub plant_type: String,
}

/// How many of the strongest in-season plants to report.
const ACTIVE_PLANT_LIMIT: usize = 3;

impl PollenResponse {
    /// Reduce the forecast day at `day_offset` to a report. Returns None
    /// when the response carries no data for that day.
    pub fn report_for_day(self, day_offset: u8) -> Option<PollenReport> {
        let day = self.daily_info.into_iter().nth(day_offset as usize)?;

        let mut types = BTreeMap::new();
        for info in day.pollen_type_info {
            let Some(index) = info.index_info else { continue };
            types.insert(
                info.code.to_lowercase(),
                PollenLevel {
                    level: index.value,
                    category: index.category,
                    in_season: info.in_season,
                },
            );
        }

        let (worst_type, overall_level) = types
            .iter()
            .max_by_key(|(_, level)| level.level)
            .map(|(code, level)| (code.clone(), level.level))
            .unwrap_or_else(|| ("none".to_string(), 0));

        let mut active_plants: Vec<ActivePlant> = day
            .plant_info
            .into_iter()
            .filter(|plant| plant.in_season)
            .filter_map(|plant| {
                let index = plant.index_info?;
                if index.value == 0 {
                    return None;
                }
                Some(ActivePlant {
                    name: plant.display_name,
                    level: index.value,
                    plant_type: plant
                        .plant_description
                        .map(|d| d.plant_type.to_lowercase())
                        .unwrap_or_default(),
                })
            })
            .collect();
        active_plants.sort_by(|a, b| b.level.cmp(&a.level));
        active_plants.truncate(ACTIVE_PLANT_LIMIT);

        Some(PollenReport {
            day_offset,
            overall_level,
            worst_type,
            types,
            active_plants,
        })
    }
}

// ============================================================================
// PLACES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacesRequest {
    pub location_restriction: LocationRestriction,
    pub included_types: Vec<String>,
    pub max_result_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    pub center: LatLngObject,
    pub radius: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub display_name: Option<DisplayName>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub text: String,
}

impl Place {
    pub fn into_venue(self) -> Venue {
        Venue {
            name: self
                .display_name
                .map(|d| d.text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            address: self
                .formatted_address
                .unwrap_or_else(|| "Unknown".to_string()),
            rating: self.rating.unwrap_or(0.0),
            types: self.types,
        }
    }
}

// ============================================================================
// ROUTES
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesRequest {
    pub origin: AddressWaypoint,
    pub destination: AddressWaypoint,
    pub travel_mode: String,
    pub units: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddressWaypoint {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutesResponse {
    #[serde(default)]
    pub routes: Vec<RouteWire>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteWire {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub distance_meters: Option<i64>,
}

impl RouteWire {
    /// Parse the `"123s"` duration form into whole seconds.
    pub fn duration_seconds(&self) -> Option<i64> {
        self.duration.as_ref()?.trim_end_matches('s').parse().ok()
    }
}
