//! In-memory provider fakes shared by the engine tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tripweave_core::{
    AirQualitySummary, Coordinates, DayPartForecast, EntityKind, GeoPoint, PollenReport,
    ProviderError, RecommendationItem, RouteSummary, TimeWindow, TravelMode, Venue, WeatherReport,
};
use tripweave_providers::{EnvironmentalData, TasteGraph, TextGenerator};

fn upstream_error(provider: &str) -> ProviderError {
    ProviderError::UpstreamRejected {
        provider: provider.to_string(),
        status: 500,
        detail: "scripted failure".to_string(),
    }
}

/// Taste-graph fake: name -> entity id, entity id -> recommendations.
/// Records every search so tests can assert dispatch counts.
#[derive(Default)]
pub struct FakeTasteGraph {
    entities: HashMap<String, String>,
    recommendations: HashMap<String, Vec<RecommendationItem>>,
    failing_kinds: Vec<EntityKind>,
    pub searches: Mutex<Vec<String>>,
}

impl FakeTasteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(
        mut self,
        name: &str,
        entity_id: &str,
        recommendations: Vec<RecommendationItem>,
    ) -> Self {
        self.entities.insert(name.to_string(), entity_id.to_string());
        self.recommendations
            .insert(entity_id.to_string(), recommendations);
        self
    }

    /// Every call against `kind` fails.
    pub fn failing_for(mut self, kind: EntityKind) -> Self {
        self.failing_kinds.push(kind);
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

#[async_trait]
impl TasteGraph for FakeTasteGraph {
    async fn search(&self, name: &str, kind: EntityKind) -> Result<Option<String>, ProviderError> {
        self.searches.lock().unwrap().push(name.to_string());
        if self.failing_kinds.contains(&kind) {
            return Err(upstream_error("taste-graph"));
        }
        Ok(self.entities.get(name).cloned())
    }

    async fn recommendations(
        &self,
        entity_id: &str,
        kind: EntityKind,
        limit: u32,
    ) -> Result<Vec<RecommendationItem>, ProviderError> {
        if self.failing_kinds.contains(&kind) {
            return Err(upstream_error("taste-graph"));
        }
        let mut items = self
            .recommendations
            .get(entity_id)
            .cloned()
            .unwrap_or_default();
        items.truncate(limit as usize);
        Ok(items)
    }
}

pub fn sample_weather() -> WeatherReport {
    WeatherReport {
        max_temperature: Some(24.0),
        min_temperature: Some(14.0),
        feels_like_max: Some(25.0),
        feels_like_min: Some(13.0),
        temperature_unit: "CELSIUS".to_string(),
        daytime: DayPartForecast {
            condition: Some("Sunny".to_string()),
            ..DayPartForecast::default()
        },
        nighttime: DayPartForecast::default(),
        sunrise: Some("06:41".to_string()),
        sunset: Some("20:12".to_string()),
    }
}

pub fn sample_air_quality() -> AirQualitySummary {
    AirQualitySummary {
        average_aqi: 62,
        min_aqi: 55,
        max_aqi: 71,
        hourly: Vec::new(),
    }
}

pub fn sample_pollen(day_offset: u8) -> PollenReport {
    PollenReport {
        day_offset,
        overall_level: 2,
        worst_type: "grass".to_string(),
        types: Default::default(),
        active_plants: Vec::new(),
    }
}

pub fn sample_venues() -> Vec<Venue> {
    vec![
        Venue {
            name: "National Art Museum".to_string(),
            address: "1 Museum Way".to_string(),
            rating: 4.6,
            types: vec!["art_gallery".to_string()],
        },
        Venue {
            name: "Old Town Theater".to_string(),
            address: "22 Stage St".to_string(),
            rating: 4.3,
            types: vec!["performing_arts_theater".to_string()],
        },
    ]
}

pub fn city_geo_point() -> GeoPoint {
    GeoPoint {
        coordinates: Coordinates {
            latitude: 45.7489,
            longitude: 21.2087,
        },
        place_types: vec!["locality".to_string(), "political".to_string()],
        bounds: None,
    }
}

/// Environmental-data fake: each signal either succeeds with canned data
/// or fails, per the constructed flags.
pub struct FakeEnvironment {
    pub geocode_result: Result<GeoPoint, ()>,
    pub weather_result: Result<WeatherReport, ()>,
    pub air_result: Result<AirQualitySummary, ()>,
    pub pollen_ok: bool,
    pub venues_result: Result<Vec<Venue>, ()>,
    pub route_ok: bool,
    pub pollen_calls: Mutex<Vec<u8>>,
}

impl FakeEnvironment {
    pub fn healthy() -> Self {
        Self {
            geocode_result: Ok(city_geo_point()),
            weather_result: Ok(sample_weather()),
            air_result: Ok(sample_air_quality()),
            pollen_ok: true,
            venues_result: Ok(sample_venues()),
            route_ok: true,
            pollen_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_failing_weather(mut self) -> Self {
        self.weather_result = Err(());
        self
    }

    pub fn with_failing_air(mut self) -> Self {
        self.air_result = Err(());
        self
    }

    pub fn with_failing_pollen(mut self) -> Self {
        self.pollen_ok = false;
        self
    }

    pub fn with_failing_venues(mut self) -> Self {
        self.venues_result = Err(());
        self
    }

    pub fn with_geo_point(mut self, point: GeoPoint) -> Self {
        self.geocode_result = Ok(point);
        self
    }

    pub fn pollen_call_count(&self) -> usize {
        self.pollen_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EnvironmentalData for FakeEnvironment {
    async fn geocode(&self, _address: &str) -> Result<GeoPoint, ProviderError> {
        self.geocode_result
            .clone()
            .map_err(|_| upstream_error("maps"))
    }

    async fn weather(
        &self,
        _coordinates: Coordinates,
        _day_offset: u8,
    ) -> Result<WeatherReport, ProviderError> {
        self.weather_result
            .clone()
            .map_err(|_| upstream_error("maps"))
    }

    async fn air_quality(
        &self,
        _coordinates: Coordinates,
        _window: TimeWindow,
    ) -> Result<AirQualitySummary, ProviderError> {
        self.air_result.clone().map_err(|_| upstream_error("maps"))
    }

    async fn pollen(
        &self,
        _coordinates: Coordinates,
        day_offset: u8,
    ) -> Result<PollenReport, ProviderError> {
        self.pollen_calls.lock().unwrap().push(day_offset);
        if self.pollen_ok {
            Ok(sample_pollen(day_offset))
        } else {
            Err(upstream_error("maps"))
        }
    }

    async fn nearby_venues(
        &self,
        _coordinates: Coordinates,
        _radius_m: f64,
        _max_results: u32,
    ) -> Result<Vec<Venue>, ProviderError> {
        self.venues_result
            .clone()
            .map_err(|_| upstream_error("maps"))
    }

    async fn route(
        &self,
        start_address: &str,
        end_address: &str,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError> {
        if !self.route_ok {
            return Err(upstream_error("maps"));
        }
        Ok(RouteSummary {
            start_address: start_address.to_string(),
            end_address: end_address.to_string(),
            mode,
            duration_minutes: 12,
            distance_km: 3.4,
        })
    }
}

/// Text-generation fake returning a fixed response, recording prompts.
pub struct ScriptedGenerator {
    response: Result<String, ()>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Err(()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response
            .clone()
            .map_err(|_| upstream_error("textgen"))
    }
}
