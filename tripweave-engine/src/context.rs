//! Environmental context assembly: geocode plus a fan-out of optional
//! signals. Unlike the taste aggregate, every signal here is
//! independently optional - a missing forecast degrades the prompt, it
//! does not fail the request.

use crate::fanout::{fan_out, SubOperation};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use tripweave_core::{
    AirQualitySummary, GeoPoint, PollenReport, TimeWindow, TripweaveError, ValidationError, Venue,
    WeatherReport,
};
use tripweave_providers::EnvironmentalData;

/// Farthest day offset the daily weather forecast covers.
pub const WEATHER_HORIZON_DAYS: u8 = 9;

/// Farthest day offset the pollen forecast covers.
pub const POLLEN_HORIZON_DAYS: u8 = 4;

/// Hours of air-quality data summarized for the target day.
const AIR_WINDOW_HOURS: i64 = 8;

/// Venue search defaults for context assembly.
const VENUE_RADIUS_M: f64 = 5_000.0;
const VENUE_LIMIT: u32 = 10;

/// The merged environmental bundle for one destination and day.
///
/// `place` is always present (a destination that will not geocode cannot
/// be planned for); everything else is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentContext {
    pub place: GeoPoint,
    pub day_offset: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<AirQualitySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pollen: Option<PollenReport>,
    #[serde(default)]
    pub venues: Vec<Venue>,
}

enum Signal {
    Weather(WeatherReport),
    Air(AirQualitySummary),
    Pollen(PollenReport),
    Venues(Vec<Venue>),
}

/// Collects the environmental context bundle.
pub struct ContextService {
    provider: Arc<dyn EnvironmentalData>,
}

impl ContextService {
    pub fn new(provider: Arc<dyn EnvironmentalData>) -> Self {
        Self { provider }
    }

    /// Geocode the destination, then gather weather, air quality, pollen
    /// and venues concurrently. Geocoding failure is fatal; each signal
    /// failure is logged and leaves its slot empty. Signals whose
    /// forecast horizon the target day exceeds are not dispatched at
    /// all.
    pub async fn collect(
        &self,
        destination: &str,
        day_offset: u8,
    ) -> Result<EnvironmentContext, TripweaveError> {
        if day_offset > WEATHER_HORIZON_DAYS {
            return Err(ValidationError::InvalidValue {
                field: "day_offset".to_string(),
                reason: format!("at most {} days ahead are supported", WEATHER_HORIZON_DAYS),
            }
            .into());
        }

        let place = self.provider.geocode(destination).await?;
        let coordinates = place.coordinates;

        let mut operations: Vec<(String, SubOperation<'_, Signal>)> = vec![
            (
                "weather".to_string(),
                Box::pin(async move {
                    self.provider
                        .weather(coordinates, day_offset)
                        .await
                        .map(Signal::Weather)
                }),
            ),
            (
                "venues".to_string(),
                Box::pin(async move {
                    self.provider
                        .nearby_venues(coordinates, VENUE_RADIUS_M, VENUE_LIMIT)
                        .await
                        .map(Signal::Venues)
                }),
            ),
        ];

        if let Some(window) = air_window(day_offset) {
            operations.push((
                "air_quality".to_string(),
                Box::pin(async move {
                    self.provider
                        .air_quality(coordinates, window)
                        .await
                        .map(Signal::Air)
                }),
            ));
        }

        if day_offset <= POLLEN_HORIZON_DAYS {
            operations.push((
                "pollen".to_string(),
                Box::pin(async move {
                    self.provider
                        .pollen(coordinates, day_offset)
                        .await
                        .map(Signal::Pollen)
                }),
            ));
        }

        let mut context = EnvironmentContext {
            place,
            day_offset,
            weather: None,
            air_quality: None,
            pollen: None,
            venues: Vec::new(),
        };

        for (name, outcome) in fan_out(operations).await {
            match outcome {
                Ok(Signal::Weather(report)) => context.weather = Some(report),
                Ok(Signal::Air(summary)) => context.air_quality = Some(summary),
                Ok(Signal::Pollen(report)) => context.pollen = Some(report),
                Ok(Signal::Venues(venues)) => context.venues = venues,
                Err(err) => {
                    warn!(signal = %name, error = %err, "environmental signal unavailable");
                }
            }
        }

        Ok(context)
    }
}

/// Air-quality window over the target day, or `None` when the day lies
/// beyond the hourly forecast horizon.
fn air_window(day_offset: u8) -> Option<TimeWindow> {
    let start = Utc::now() + Duration::days(day_offset as i64);
    TimeWindow::new(start, start + Duration::hours(AIR_WINDOW_HOURS)).ok()
}
