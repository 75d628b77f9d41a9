//! The cache-backed request/response surface.
//!
//! One operation per public capability. Each takes a serde query struct,
//! validates it, and runs its compute under [`cached`], so the query
//! struct doubles as the cache-key payload. TTL is chosen here, per
//! operation class, never inside the store.

use crate::context::{ContextService, POLLEN_HORIZON_DAYS, WEATHER_HORIZON_DAYS};
use crate::planner::{ActivityOptions, ActivityPlanner, ActivityRequest};
use crate::taste::TasteService;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tripweave_cache::{cached, CacheStore};
use tripweave_core::{
    AggregateResult, AirQualitySummary, CacheTtlConfig, Coordinates, GeoPoint, PollenReport,
    PreferenceSet, RouteSummary, TimeWindow, Timestamp, TravelMode, TripweaveResult,
    ValidationError, Venue, WeatherReport,
};
use tripweave_providers::{EnvironmentalData, TasteGraph, TextGenerator};

const MAX_VENUE_RADIUS_M: f64 = 50_000.0;
const MAX_VENUE_RESULTS: u32 = 20;
const MAX_TASTE_LIMIT: u32 = 20;

/// Response envelope for every surface operation. `generated_at` is the
/// compute time, so a cache hit replays the original timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: T,
    pub generated_at: Timestamp,
}

impl<T> Response<T> {
    fn fresh(data: T) -> Self {
        Self {
            data,
            generated_at: Utc::now(),
        }
    }
}

// ============================================================================
// QUERY TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub max_results: u32,
}

impl VenueQuery {
    fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !(self.radius_m >= 1.0 && self.radius_m <= MAX_VENUE_RADIUS_M) {
            return Err(ValidationError::InvalidValue {
                field: "radius_m".to_string(),
                reason: format!("must be between 1 and {} meters", MAX_VENUE_RADIUS_M),
            });
        }
        if self.max_results == 0 || self.max_results > MAX_VENUE_RESULTS {
            return Err(ValidationError::InvalidValue {
                field: "max_results".to_string(),
                reason: format!("must be between 1 and {}", MAX_VENUE_RESULTS),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    pub start: String,
    pub end: String,
    pub mode: TravelMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeQuery {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherQuery {
    pub address: String,
    /// Target calendar day, today or later.
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AirQualityQuery {
    fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollenQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsCityQuery {
    pub place: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasteQuery {
    pub preferences: PreferenceSet,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayQuery {
    pub cities: Vec<String>,
    pub preferences: PreferenceSet,
    pub option_count: u32,
}

/// Cache-key payload for `today_options`: the 24 h TTL must not let an
/// entry outlive the calendar day it was computed for, so today's date
/// is part of the key.
#[derive(Serialize)]
struct TodayKey<'a> {
    date: NaiveDate,
    #[serde(flatten)]
    query: &'a TodayQuery,
}

/// Day offset of `date` from today; past dates are rejected.
fn day_offset_from_today(date: NaiveDate, horizon_days: u8) -> Result<u8, ValidationError> {
    let offset = (date - Utc::now().date_naive()).num_days();
    if offset < 0 {
        return Err(ValidationError::InvalidValue {
            field: "date".to_string(),
            reason: "date is in the past".to_string(),
        });
    }
    if offset > horizon_days as i64 {
        return Err(ValidationError::InvalidValue {
            field: "date".to_string(),
            reason: format!("at most {} days ahead are supported", horizon_days),
        });
    }
    Ok(offset as u8)
}

// ============================================================================
// SURFACE
// ============================================================================

/// All cache-backed operations, wired to one store and one provider set.
pub struct Surface {
    store: Arc<dyn CacheStore>,
    environment: Arc<dyn EnvironmentalData>,
    taste: TasteService,
    planner: ActivityPlanner,
    ttl: CacheTtlConfig,
}

impl Surface {
    pub fn new(
        store: Arc<dyn CacheStore>,
        taste_graph: Arc<dyn TasteGraph>,
        environment: Arc<dyn EnvironmentalData>,
        generator: Arc<dyn TextGenerator>,
        ttl: CacheTtlConfig,
    ) -> Self {
        let planner = ActivityPlanner::new(
            TasteService::new(taste_graph.clone()),
            ContextService::new(environment.clone()),
            generator,
        );
        Self {
            store,
            environment,
            taste: TasteService::new(taste_graph),
            planner,
            ttl,
        }
    }

    pub async fn venues(&self, query: &VenueQuery) -> TripweaveResult<Response<Vec<Venue>>> {
        query.validate()?;
        cached(
            self.store.as_ref(),
            "venues",
            query,
            self.ttl.environmental,
            || async {
                let venues = self
                    .environment
                    .nearby_venues(query.coordinates(), query.radius_m, query.max_results)
                    .await?;
                Ok(Response::fresh(venues))
            },
        )
        .await
    }

    pub async fn routes(&self, query: &RouteQuery) -> TripweaveResult<Response<RouteSummary>> {
        for (field, value) in [("start", &query.start), ("end", &query.end)] {
            if value.trim().is_empty() {
                return Err(ValidationError::RequiredFieldMissing {
                    field: field.to_string(),
                }
                .into());
            }
        }
        cached(
            self.store.as_ref(),
            "routes",
            query,
            self.ttl.environmental,
            || async {
                let route = self
                    .environment
                    .route(&query.start, &query.end, query.mode)
                    .await?;
                Ok(Response::fresh(route))
            },
        )
        .await
    }

    pub async fn geocode(&self, query: &GeocodeQuery) -> TripweaveResult<Response<GeoPoint>> {
        if query.address.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "address".to_string(),
            }
            .into());
        }
        cached(
            self.store.as_ref(),
            "geocode",
            query,
            self.ttl.environmental,
            || async {
                let point = self.environment.geocode(&query.address).await?;
                Ok(Response::fresh(point))
            },
        )
        .await
    }

    /// Weather for the target day: geocode, then the daily forecast at
    /// the day offset the target date works out to.
    pub async fn weather(&self, query: &WeatherQuery) -> TripweaveResult<Response<WeatherReport>> {
        if query.address.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "address".to_string(),
            }
            .into());
        }
        let day_offset = day_offset_from_today(query.date, WEATHER_HORIZON_DAYS)?;
        cached(
            self.store.as_ref(),
            "weather",
            query,
            self.ttl.environmental,
            || async {
                let point = self.environment.geocode(&query.address).await?;
                let report = self
                    .environment
                    .weather(point.coordinates, day_offset)
                    .await?;
                Ok(Response::fresh(report))
            },
        )
        .await
    }

    pub async fn air_quality(
        &self,
        query: &AirQualityQuery,
    ) -> TripweaveResult<Response<AirQualitySummary>> {
        let window = TimeWindow::new(query.start, query.end)?;
        cached(
            self.store.as_ref(),
            "air_quality",
            query,
            self.ttl.environmental,
            || async {
                let summary = self
                    .environment
                    .air_quality(query.coordinates(), window)
                    .await?;
                Ok(Response::fresh(summary))
            },
        )
        .await
    }

    pub async fn pollen(&self, query: &PollenQuery) -> TripweaveResult<Response<PollenReport>> {
        let day_offset = day_offset_from_today(query.date, POLLEN_HORIZON_DAYS)?;
        cached(
            self.store.as_ref(),
            "pollen",
            query,
            self.ttl.environmental,
            || async {
                let coordinates = Coordinates {
                    latitude: query.latitude,
                    longitude: query.longitude,
                };
                let report = self.environment.pollen(coordinates, day_offset).await?;
                Ok(Response::fresh(report))
            },
        )
        .await
    }

    /// Whether the named place geocodes to something city-like.
    pub async fn is_city(&self, query: &IsCityQuery) -> TripweaveResult<Response<bool>> {
        if query.place.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "place".to_string(),
            }
            .into());
        }
        cached(
            self.store.as_ref(),
            "is_city",
            query,
            self.ttl.environmental,
            || async {
                let point = self.environment.geocode(&query.place).await?;
                Ok(Response::fresh(point.is_city()))
            },
        )
        .await
    }

    pub async fn taste_recommendations(
        &self,
        query: &TasteQuery,
    ) -> TripweaveResult<Response<AggregateResult>> {
        if query.limit == 0 || query.limit > MAX_TASTE_LIMIT {
            return Err(ValidationError::InvalidValue {
                field: "limit".to_string(),
                reason: format!("must be between 1 and {}", MAX_TASTE_LIMIT),
            }
            .into());
        }
        cached(
            self.store.as_ref(),
            "taste_recommendations",
            query,
            self.ttl.taste,
            || async {
                let result = self.taste.aggregate(&query.preferences, query.limit).await?;
                Ok(Response::fresh(result))
            },
        )
        .await
    }

    pub async fn activity_options(
        &self,
        request: &ActivityRequest,
    ) -> TripweaveResult<Response<ActivityOptions>> {
        request.validate()?;
        cached(
            self.store.as_ref(),
            "activity_options",
            request,
            self.ttl.taste,
            || async {
                let options = self.planner.plan(request).await?;
                Ok(Response::fresh(options))
            },
        )
        .await
    }

    pub async fn today_options(
        &self,
        query: &TodayQuery,
    ) -> TripweaveResult<Response<ActivityOptions>> {
        let key = TodayKey {
            date: Utc::now().date_naive(),
            query,
        };
        cached(
            self.store.as_ref(),
            "today_options",
            &key,
            self.ttl.today,
            || async {
                let options = self
                    .planner
                    .today(&query.cities, &query.preferences, query.option_count)
                    .await?;
                Ok(Response::fresh(options))
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeEnvironment, FakeTasteGraph, ScriptedGenerator};
    use chrono::Duration;
    use tripweave_cache::MemoryCacheStore;
    use tripweave_core::{Category, RecommendationItem, TripweaveError};

    const OPTIONS_JSON: &str = r#"{"options": [
        {"title": "Riverside walk", "description": "Follow the canal", "indoor": false}
    ]}"#;

    struct Harness {
        store: Arc<MemoryCacheStore>,
        environment: Arc<FakeEnvironment>,
        generator: Arc<ScriptedGenerator>,
        surface: Surface,
    }

    fn harness(environment: FakeEnvironment) -> Harness {
        let store = Arc::new(MemoryCacheStore::new());
        let environment = Arc::new(environment);
        let generator = Arc::new(ScriptedGenerator::replying(OPTIONS_JSON));
        let graph = Arc::new(FakeTasteGraph::new().with_entity(
            "Daft Punk",
            "ent-1",
            vec![RecommendationItem::new("Justice")],
        ));
        let surface = Surface::new(
            store.clone(),
            graph,
            environment.clone(),
            generator.clone(),
            CacheTtlConfig::standard(),
        );
        Harness {
            store,
            environment,
            generator,
            surface,
        }
    }

    fn venue_query() -> VenueQuery {
        VenueQuery {
            latitude: 45.75,
            longitude: 21.23,
            radius_m: 5_000.0,
            max_results: 10,
        }
    }

    #[tokio::test]
    async fn out_of_range_inputs_are_rejected_before_caching() {
        let h = harness(FakeEnvironment::healthy());

        let oversized = VenueQuery {
            radius_m: 60_000.0,
            ..venue_query()
        };
        assert!(matches!(
            h.surface.venues(&oversized).await,
            Err(TripweaveError::Validation(_))
        ));

        let greedy = VenueQuery {
            max_results: 21,
            ..venue_query()
        };
        assert!(matches!(
            h.surface.venues(&greedy).await,
            Err(TripweaveError::Validation(_))
        ));

        assert_eq!(h.store.stats().entries, 0);
    }

    #[tokio::test]
    async fn repeated_queries_hit_the_cache() {
        let h = harness(FakeEnvironment::healthy());
        let query = PollenQuery {
            latitude: 45.75,
            longitude: 21.23,
            date: Utc::now().date_naive(),
        };

        let first = h.surface.pollen(&query).await.unwrap();
        let second = h.surface.pollen(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.environment.pollen_call_count(), 1);
        assert_eq!(h.store.stats().hits, 1);
    }

    #[tokio::test]
    async fn provider_failures_are_not_cached() {
        let h = harness(FakeEnvironment::healthy().with_failing_venues());

        let err = h.surface.venues(&venue_query()).await.unwrap_err();
        assert!(matches!(err, TripweaveError::Provider(_)));
        assert_eq!(h.store.stats().entries, 0);
    }

    #[tokio::test]
    async fn weather_rejects_past_dates() {
        let h = harness(FakeEnvironment::healthy());
        let query = WeatherQuery {
            address: "Timisoara".to_string(),
            date: Utc::now().date_naive() - Duration::days(1),
        };
        assert!(matches!(
            h.surface.weather(&query).await,
            Err(TripweaveError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pollen_rejects_dates_beyond_its_horizon() {
        let h = harness(FakeEnvironment::healthy());
        let query = PollenQuery {
            latitude: 45.75,
            longitude: 21.23,
            date: Utc::now().date_naive() + Duration::days(6),
        };
        assert!(matches!(
            h.surface.pollen(&query).await,
            Err(TripweaveError::Validation(_))
        ));
        assert_eq!(h.environment.pollen_call_count(), 0);
    }

    #[tokio::test]
    async fn air_quality_window_is_validated() {
        let h = harness(FakeEnvironment::healthy());
        let now = Utc::now();
        let query = AirQualityQuery {
            latitude: 45.75,
            longitude: 21.23,
            start: now + Duration::hours(100),
            end: now + Duration::hours(104),
        };
        assert!(matches!(
            h.surface.air_quality(&query).await,
            Err(TripweaveError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn is_city_reflects_geocoded_place_types() {
        let h = harness(FakeEnvironment::healthy());
        let city = h
            .surface
            .is_city(&IsCityQuery {
                place: "Timisoara".to_string(),
            })
            .await
            .unwrap();
        assert!(city.data);

        let mut street_point = crate::testutil::city_geo_point();
        street_point.place_types = vec!["route".to_string()];
        let h = harness(FakeEnvironment::healthy().with_geo_point(street_point));
        let street = h
            .surface
            .is_city(&IsCityQuery {
                place: "Some Street 5".to_string(),
            })
            .await
            .unwrap();
        assert!(!street.data);
    }

    #[tokio::test]
    async fn taste_recommendations_are_cached_per_profile() {
        let h = harness(FakeEnvironment::healthy());
        let mut preferences = PreferenceSet::new();
        preferences.insert(Category::Artists, vec!["Daft Punk".to_string()]);
        let query = TasteQuery {
            preferences,
            limit: 5,
        };

        let first = h.surface.taste_recommendations(&query).await.unwrap();
        let second = h.surface.taste_recommendations(&query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.store.stats().hits, 1);
    }

    #[tokio::test]
    async fn today_options_run_generation_once_per_day_and_query() {
        let h = harness(FakeEnvironment::healthy());
        let mut preferences = PreferenceSet::new();
        preferences.insert(Category::Artists, vec!["Daft Punk".to_string()]);
        let query = TodayQuery {
            cities: vec!["Vienna".to_string()],
            preferences,
            option_count: 3,
        };

        let first = h.surface.today_options(&query).await.unwrap();
        let second = h.surface.today_options(&query).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn activity_options_cache_the_whole_bundle() {
        let h = harness(FakeEnvironment::healthy());
        let mut preferences = PreferenceSet::new();
        preferences.insert(Category::Artists, vec!["Daft Punk".to_string()]);
        let request = ActivityRequest {
            destination: "Timisoara".to_string(),
            day_offset: 1,
            preferences,
            option_count: 5,
        };

        let first = h.surface.activity_options(&request).await.unwrap();
        let second = h.surface.activity_options(&request).await.unwrap();
        assert_eq!(first.data.options[0].title, "Riverside walk");
        assert_eq!(first, second);
        assert_eq!(h.generator.prompts.lock().unwrap().len(), 1);
    }
}
