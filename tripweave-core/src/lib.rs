//! Tripweave Core - Entity Types
//!
//! Pure data structures with no behavior beyond construction and
//! normalization. All other crates depend on this. This crate contains
//! ONLY data types - no I/O, no business logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod config;
pub mod environment;
pub mod error;

pub use config::{
    CacheTtlConfig, MapsConfig, TasteGraphConfig, TextGenConfig, TripweaveConfig,
};
pub use environment::{
    ActivePlant, AirQualitySummary, Coordinates, DayPartForecast, GeoPoint, HourlyAqi,
    PollenLevel, PollenReport, RouteSummary, TimeWindow, TravelMode, Venue, Viewport,
    WeatherReport, AIR_QUALITY_HORIZON_HOURS,
};
pub use error::{
    AggregationError, CacheError, GenerationError, ProviderError, SerializationError,
    TripweaveError, TripweaveResult, ValidationError,
};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Normalize a free-text item name for deduplication and self-exclusion:
/// whitespace-trimmed, lowercased. Two names are "the same item" exactly
/// when their normalized forms are equal.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============================================================================
// PREFERENCE CATEGORIES
// ============================================================================

/// A preference category in a user's taste profile.
///
/// Categories form a closed set; membership is a set, insertion order is
/// irrelevant. Each category maps onto one taste-graph entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Artists,
    Books,
    Movies,
    Brands,
    VideoGames,
    TvShows,
    Podcasts,
    Persons,
}

impl Category {
    /// All categories, in canonical order.
    pub const ALL: [Category; 8] = [
        Category::Artists,
        Category::Books,
        Category::Movies,
        Category::Brands,
        Category::VideoGames,
        Category::TvShows,
        Category::Podcasts,
        Category::Persons,
    ];

    /// Canonical snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Artists => "artists",
            Category::Books => "books",
            Category::Movies => "movies",
            Category::Brands => "brands",
            Category::VideoGames => "video_games",
            Category::TvShows => "tv_shows",
            Category::Podcasts => "podcasts",
            Category::Persons => "persons",
        }
    }

    /// Parse a canonical name back into a category.
    pub fn parse(name: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == name)
    }

    /// The taste-graph entity kind this category queries.
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Category::Artists => EntityKind::Artist,
            Category::Books => EntityKind::Book,
            Category::Movies => EntityKind::Movie,
            Category::Brands => EntityKind::Brand,
            Category::VideoGames => EntityKind::VideoGame,
            Category::TvShows => EntityKind::TvShow,
            Category::Podcasts => EntityKind::Podcast,
            Category::Persons => EntityKind::Person,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kind on the taste-graph side.
///
/// A superset of [`Category`]: `Destination` is queried for city
/// recommendations but is not a user preference category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Artist,
    Book,
    Movie,
    Brand,
    VideoGame,
    TvShow,
    Podcast,
    Person,
    Destination,
}

impl EntityKind {
    /// The taste-graph URN for this entity kind.
    pub fn urn(&self) -> &'static str {
        match self {
            EntityKind::Artist => "urn:entity:artist",
            EntityKind::Book => "urn:entity:book",
            EntityKind::Movie => "urn:entity:movie",
            EntityKind::Brand => "urn:entity:brand",
            EntityKind::VideoGame => "urn:entity:videogame",
            EntityKind::TvShow => "urn:entity:tv_show",
            EntityKind::Podcast => "urn:entity:podcast",
            EntityKind::Person => "urn:entity:person",
            EntityKind::Destination => "urn:entity:destination",
        }
    }
}

// ============================================================================
// PREFERENCE SET
// ============================================================================

/// A user's taste profile: category -> ordered sequence of item names.
///
/// Backed by a `BTreeMap` so iteration order is deterministic regardless
/// of insertion order. Categories holding an empty sequence are treated as
/// absent by [`PreferenceSet::non_empty`] and never dispatched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    categories: BTreeMap<Category, Vec<String>>,
}

impl PreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the items for a category, replacing any previous entry.
    pub fn insert(&mut self, category: Category, items: Vec<String>) -> &mut Self {
        self.categories.insert(category, items);
        self
    }

    /// Items for a category; empty slice when absent.
    pub fn get(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate categories that carry at least one item, in canonical order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.categories
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(c, items)| (*c, items.as_slice()))
    }

    /// True when no category carries any item.
    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }
}

// ============================================================================
// SUB-REQUESTS AND RESULTS
// ============================================================================

/// One per-category upstream call, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRequest {
    category: Category,
    items: Vec<String>,
    limit: u32,
}

impl SubRequest {
    /// Construct a sub-request. `limit` must be at least 1.
    pub fn new(
        category: Category,
        items: Vec<String>,
        limit: u32,
    ) -> Result<Self, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::InvalidValue {
                field: "limit".to_string(),
                reason: "limit must be at least 1".to_string(),
            });
        }
        Ok(Self {
            category,
            items,
            limit,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// A single recommended entity coming back from the taste graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub name: String,
    /// Genre tags, where the upstream entity carries any.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Affinity score relative to the seed entity, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RecommendationItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genres: Vec::new(),
            score: None,
        }
    }

    /// Normalized form of the name used for dedup equality.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// The merged output of one taste aggregation.
///
/// Failure carries no partial data: a failed aggregation is expressed as
/// `Err(_)`, never as an `AggregateResult` with holes. On success, every
/// originally non-empty input category has an entry (possibly empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub per_category: BTreeMap<Category, Vec<RecommendationItem>>,
}

impl AggregateResult {
    /// Total number of recommendation items across all categories.
    pub fn total(&self) -> usize {
        self.per_category.values().map(Vec::len).sum()
    }
}
