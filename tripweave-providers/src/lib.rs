//! Tripweave providers - upstream boundary adapters.
//!
//! Provider-agnostic traits for the three upstream services, plus the
//! reqwest-backed client implementations. Every adapter is a pure
//! boundary function: one upstream network operation (or a small fixed
//! sequence such as geocode-then-lookup) mapped into a typed
//! `Result<T, ProviderError>`. Adapters never retry and never cache -
//! both are the caller's responsibility, which keeps each implementation
//! reusable under cached and uncached call sites.

use async_trait::async_trait;
use tripweave_core::{
    AirQualitySummary, Coordinates, EntityKind, GeoPoint, PollenReport, ProviderError,
    RecommendationItem, RouteSummary, TimeWindow, TravelMode, Venue, WeatherReport,
};

pub mod maps;
pub mod taste;
pub mod textgen;

pub use maps::MapsClient;
pub use taste::TasteGraphClient;
pub use textgen::TextGenClient;

/// Cultural taste-graph provider.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TasteGraph: Send + Sync {
    /// Resolve a free-text name to an entity id, if the graph knows it.
    async fn search(
        &self,
        name: &str,
        kind: EntityKind,
    ) -> Result<Option<String>, ProviderError>;

    /// Recommendations seeded by one entity, at most `limit` of them.
    async fn recommendations(
        &self,
        entity_id: &str,
        kind: EntityKind,
        limit: u32,
    ) -> Result<Vec<RecommendationItem>, ProviderError>;
}

/// Mapping and environmental-data provider. One typed operation per
/// upstream endpoint.
#[async_trait]
pub trait EnvironmentalData: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, ProviderError>;

    /// Forecast for the day `day_offset` days from today (0 = today).
    async fn weather(
        &self,
        coordinates: Coordinates,
        day_offset: u8,
    ) -> Result<WeatherReport, ProviderError>;

    /// Hourly universal-AQI summary over `window`.
    async fn air_quality(
        &self,
        coordinates: Coordinates,
        window: TimeWindow,
    ) -> Result<AirQualitySummary, ProviderError>;

    /// Pollen forecast `day_offset` days from today.
    async fn pollen(
        &self,
        coordinates: Coordinates,
        day_offset: u8,
    ) -> Result<PollenReport, ProviderError>;

    /// Cultural venues within `radius_m` meters.
    async fn nearby_venues(
        &self,
        coordinates: Coordinates,
        radius_m: f64,
        max_results: u32,
    ) -> Result<Vec<Venue>, ProviderError>;

    async fn route(
        &self,
        start_address: &str,
        end_address: &str,
        mode: TravelMode,
    ) -> Result<RouteSummary, ProviderError>;
}

/// Text-generation provider: one composed prompt in, generated text out.
/// Invoked exactly once per logical request, never fanned out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Map a reqwest transport failure into the provider taxonomy.
///
/// Timeouts keep their own kind; any other transport failure (refused
/// connection, TLS, closed socket) is reported as an upstream rejection
/// with status 0, meaning "no HTTP response was received at all".
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: err.to_string(),
        }
    } else {
        ProviderError::UpstreamRejected {
            provider: provider.to_string(),
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            detail: err.to_string(),
        }
    }
}

/// Map a decode failure on an otherwise successful response.
pub(crate) fn decode_error(provider: &str, err: impl std::fmt::Display) -> ProviderError {
    ProviderError::MalformedResponse {
        provider: provider.to_string(),
        detail: err.to_string(),
    }
}
