//! Maps/environment HTTP client.
//!
//! One adapter per upstream endpoint. Each call performs exactly one
//! network operation and maps the outcome into the provider error
//! taxonomy; retries and caching happen above this layer.

mod types;

use crate::{decode_error, transport_error, EnvironmentalData};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tripweave_core::{
    AirQualitySummary, Coordinates, GeoPoint, MapsConfig, PollenReport, ProviderError,
    RouteSummary, TimeWindow, TravelMode, Venue, WeatherReport,
};
use types::{
    AddressWaypoint, AirQualityRequest, AirQualityResponse, Circle, ForecastPeriod,
    GeocodeResponse, LocationRestriction, PlacesRequest, PlacesResponse, PollenResponse,
    RoutesRequest, RoutesResponse, WeatherResponse,
};

const PROVIDER: &str = "maps";

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const WEATHER_URL: &str = "https://weather.googleapis.com/v1/forecast/days:lookup";
const AIR_QUALITY_URL: &str = "https://airquality.googleapis.com/v1/forecast:lookup";
const POLLEN_URL: &str = "https://pollen.googleapis.com/v1/forecast:lookup";
const PLACES_URL: &str = "https://places.googleapis.com/v1/places:searchNearby";
const ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";

const PLACES_FIELD_MASK: &str =
    "places.displayName,places.formattedAddress,places.rating,places.id,places.types";
const ROUTES_FIELD_MASK: &str = "routes.duration,routes.distanceMeters";

/// Venue categories worth recommending to a traveller.
const VENUE_TYPES: [&str; 9] = [
    "museum",
    "art_gallery",
    "library",
    "book_store",
    "performing_arts_theater",
    "cultural_center",
    "tourist_attraction",
    "restaurant",
    "cafe",
];

/// Client for the mapping and environmental-data APIs.
pub struct MapsClient {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl MapsClient {
    pub fn new(config: &MapsConfig, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            timeout,
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::UpstreamRejected {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                detail,
            });
        }
        response.json().await.map_err(|e| decode_error(PROVIDER, e))
    }

    fn not_found(detail: impl Into<String>) -> ProviderError {
        ProviderError::NotFound {
            provider: PROVIDER.to_string(),
            detail: detail.into(),
        }
    }
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl EnvironmentalData for MapsClient {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, ProviderError> {
        let response = self
            .client
            .get(GEOCODE_URL)
            .query(&[("address", address), ("key", &self.api_key)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: GeocodeResponse = Self::read_json(response).await?;
        parsed
            .into_geo_point()
            .ok_or_else(|| Self::not_found(format!("no geocoding result for '{}'", address)))
    }

    async fn weather(
        &self,
        coordinates: Coordinates,
        day_offset: u8,
    ) -> Result<WeatherReport, ProviderError> {
        let response = self
            .client
            .get(WEATHER_URL)
            .query(&[
                ("key", self.api_key.clone()),
                ("location.latitude", coordinates.latitude.to_string()),
                ("location.longitude", coordinates.longitude.to_string()),
                ("days", (day_offset as u32 + 1).to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: WeatherResponse = Self::read_json(response).await?;
        parsed.report_for_day(day_offset as usize).ok_or_else(|| {
            Self::not_found(format!("no forecast for day offset {}", day_offset))
        })
    }

    async fn air_quality(
        &self,
        coordinates: Coordinates,
        window: TimeWindow,
    ) -> Result<AirQualitySummary, ProviderError> {
        let body = AirQualityRequest {
            location: coordinates.into(),
            period: ForecastPeriod {
                start_time: window.start().to_rfc3339(),
                end_time: window.end().to_rfc3339(),
            },
            page_size: (window.hours() + 1).min(96),
            extra_computations: vec![
                "HEALTH_RECOMMENDATIONS".to_string(),
                "DOMINANT_POLLUTANT_CONCENTRATION".to_string(),
                "POLLUTANT_ADDITIONAL_INFO".to_string(),
            ],
            language_code: "en".to_string(),
            universal_aqi: true,
        };

        let response = self
            .client
            .post(AIR_QUALITY_URL)
            .header("Content-Type", "application/json")
            .header("X-Goog-Api-Key", &self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: AirQualityResponse = Self::read_json(response).await?;
        parsed
            .summarize(&window)
            .ok_or_else(|| Self::not_found("no air quality data for the requested window"))
    }

    async fn pollen(
        &self,
        coordinates: Coordinates,
        day_offset: u8,
    ) -> Result<PollenReport, ProviderError> {
        let response = self
            .client
            .get(POLLEN_URL)
            .query(&[
                ("key", self.api_key.clone()),
                ("location.latitude", coordinates.latitude.to_string()),
                ("location.longitude", coordinates.longitude.to_string()),
                ("days", (day_offset as u32 + 1).to_string()),
                ("languageCode", "en".to_string()),
                ("plantsDescription", "false".to_string()),
            ])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: PollenResponse = Self::read_json(response).await?;
        parsed
            .report_for_day(day_offset)
            .ok_or_else(|| Self::not_found("no pollen data for these coordinates"))
    }

    async fn nearby_venues(
        &self,
        coordinates: Coordinates,
        radius_m: f64,
        max_results: u32,
    ) -> Result<Vec<Venue>, ProviderError> {
        let body = PlacesRequest {
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: coordinates.into(),
                    radius: radius_m,
                },
            },
            included_types: VENUE_TYPES.iter().map(|t| t.to_string()).collect(),
            max_result_count: max_results.min(20),
        };

        let response = self
            .client
            .post(PLACES_URL)
            .header("Content-Type", "application/json")
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", PLACES_FIELD_MASK)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: PlacesResponse = Self::read_json(response).await?;
        Ok(parsed
            .places
            .into_iter()
            .map(|place| place.into_venue())
            .collect())
    }

    async fn route(
        &self,
        start_address: &str,
        end_address: &str,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError> {
        let body = RoutesRequest {
            origin: AddressWaypoint {
                address: start_address.to_string(),
            },
            destination: AddressWaypoint {
                address: end_address.to_string(),
            },
            travel_mode: mode.as_str().to_string(),
            units: "METRIC".to_string(),
        };

        let response = self
            .client
            .post(ROUTES_URL)
            .header("Content-Type", "application/json")
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", ROUTES_FIELD_MASK)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let parsed: RoutesResponse = Self::read_json(response).await?;
        let route = parsed.routes.into_iter().next().ok_or_else(|| {
            Self::not_found("no route found between the specified addresses")
        })?;

        let duration_seconds = route
            .duration_seconds()
            .ok_or_else(|| decode_error(PROVIDER, "route carried no parseable duration"))?;
        let distance_meters = route
            .distance_meters
            .ok_or_else(|| decode_error(PROVIDER, "route carried no distance"))?;

        Ok(RouteSummary {
            start_address: start_address.to_string(),
            end_address: end_address.to_string(),
            mode,
            duration_minutes: duration_seconds / 60,
            distance_km: (distance_meters as f64 / 1000.0 * 100.0).round() / 100.0,
        })
    }
}
