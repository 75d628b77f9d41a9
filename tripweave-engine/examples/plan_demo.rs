//! End-to-end pipeline walkthrough against canned in-process providers.
//!
//! Run with `cargo run --example plan_demo -p tripweave-engine`; set
//! `RUST_LOG=debug` to watch the cache hits on the second pass.

use async_trait::async_trait;
use std::sync::Arc;
use tripweave_cache::MemoryCacheStore;
use tripweave_core::{
    AirQualitySummary, CacheTtlConfig, Category, Coordinates, DayPartForecast, EntityKind,
    GeoPoint, PollenReport, PreferenceSet, ProviderError, RecommendationItem, RouteSummary,
    TimeWindow, TravelMode, Venue, WeatherReport,
};
use tripweave_engine::{ActivityRequest, Surface};
use tripweave_providers::{EnvironmentalData, TasteGraph, TextGenerator};

struct CannedTasteGraph;

#[async_trait]
impl TasteGraph for CannedTasteGraph {
    async fn search(&self, name: &str, _kind: EntityKind) -> Result<Option<String>, ProviderError> {
        Ok(Some(format!("entity:{}", name.to_lowercase())))
    }

    async fn recommendations(
        &self,
        _entity_id: &str,
        _kind: EntityKind,
        _limit: u32,
    ) -> Result<Vec<RecommendationItem>, ProviderError> {
        Ok(vec![
            RecommendationItem {
                name: "Justice".to_string(),
                genres: vec!["electronic".to_string()],
                score: Some(0.92),
            },
            RecommendationItem {
                name: "Air".to_string(),
                genres: vec!["downtempo".to_string()],
                score: Some(0.87),
            },
        ])
    }
}

struct CannedEnvironment;

#[async_trait]
impl EnvironmentalData for CannedEnvironment {
    async fn geocode(&self, _address: &str) -> Result<GeoPoint, ProviderError> {
        Ok(GeoPoint {
            coordinates: Coordinates {
                latitude: 45.7489,
                longitude: 21.2087,
            },
            place_types: vec!["locality".to_string()],
            bounds: None,
        })
    }

    async fn weather(
        &self,
        _coordinates: Coordinates,
        _day_offset: u8,
    ) -> Result<WeatherReport, ProviderError> {
        Ok(WeatherReport {
            max_temperature: Some(27.0),
            min_temperature: Some(16.0),
            feels_like_max: Some(28.0),
            feels_like_min: Some(15.0),
            temperature_unit: "CELSIUS".to_string(),
            daytime: DayPartForecast {
                condition: Some("Partly cloudy".to_string()),
                ..DayPartForecast::default()
            },
            nighttime: DayPartForecast::default(),
            sunrise: Some("06:22".to_string()),
            sunset: Some("20:31".to_string()),
        })
    }

    async fn air_quality(
        &self,
        _coordinates: Coordinates,
        _window: TimeWindow,
    ) -> Result<AirQualitySummary, ProviderError> {
        Ok(AirQualitySummary {
            average_aqi: 68,
            min_aqi: 61,
            max_aqi: 74,
            hourly: Vec::new(),
        })
    }

    async fn pollen(
        &self,
        _coordinates: Coordinates,
        day_offset: u8,
    ) -> Result<PollenReport, ProviderError> {
        Ok(PollenReport {
            day_offset,
            overall_level: 2,
            worst_type: "grass".to_string(),
            types: Default::default(),
            active_plants: Vec::new(),
        })
    }

    async fn nearby_venues(
        &self,
        _coordinates: Coordinates,
        _radius_m: f64,
        _max_results: u32,
    ) -> Result<Vec<Venue>, ProviderError> {
        Ok(vec![Venue {
            name: "Art Museum".to_string(),
            address: "Unirii Square 1".to_string(),
            rating: 4.5,
            types: vec!["art_gallery".to_string()],
        }])
    }

    async fn route(
        &self,
        start_address: &str,
        end_address: &str,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError> {
        Ok(RouteSummary {
            start_address: start_address.to_string(),
            end_address: end_address.to_string(),
            mode,
            duration_minutes: 14,
            distance_km: 4.2,
        })
    }
}

struct CannedGenerator;

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(r#"{"options": [
            {"title": "Electronic music record fair",
             "description": "Crate digging near Unirii Square, matching the visitor's taste in French house.",
             "category": "music", "indoor": true},
            {"title": "Riverside sunset walk",
             "description": "Partly cloudy and 27 degrees: end the day along the Bega canal.",
             "category": "outdoors", "indoor": false}
        ]}"#
        .to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let surface = Surface::new(
        Arc::new(MemoryCacheStore::new()),
        Arc::new(CannedTasteGraph),
        Arc::new(CannedEnvironment),
        Arc::new(CannedGenerator),
        CacheTtlConfig::standard(),
    );

    let mut preferences = PreferenceSet::new();
    preferences.insert(Category::Artists, vec!["Daft Punk".to_string()]);
    preferences.insert(Category::Movies, vec!["Inception".to_string()]);

    let request = ActivityRequest {
        destination: "Timisoara".to_string(),
        day_offset: 1,
        preferences,
        option_count: 4,
    };

    let first = surface.activity_options(&request).await?;
    println!("options for {}:", request.destination);
    for option in &first.data.options {
        println!("  - {}: {}", option.title, option.description);
    }

    // Same request again: served from the cache, providers untouched.
    let second = surface.activity_options(&request).await?;
    println!(
        "second pass generated_at matches first: {}",
        first.generated_at == second.generated_at
    );

    Ok(())
}
