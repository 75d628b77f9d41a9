//! Configuration types
//!
//! Plain data. Loading (env files, CLI, whatever the embedder prefers) is
//! out of scope; the top-level handler constructs these and injects them
//! into the provider clients and the cache wrapper.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Taste-graph provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasteGraphConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Maps/environment provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapsConfig {
    pub api_key: String,
}

/// Text-generation provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGenConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: i32,
    pub temperature: f32,
}

/// TTLs per operation class. TTL is a property of the call site, not of
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// Short-lived environmental data: weather, air quality, pollen,
    /// venue and route lookups.
    pub environmental: Duration,
    /// Taste-graph recommendation aggregates.
    pub taste: Duration,
    /// "What's happening today" aggregates, bounded by calendar-day
    /// relevance.
    pub today: Duration,
}

impl CacheTtlConfig {
    /// The standard TTL policy: one hour for environmental data and taste
    /// aggregates, twenty-four hours for today-aggregates.
    pub fn standard() -> Self {
        Self {
            environmental: Duration::from_secs(3600),
            taste: Duration::from_secs(3600),
            today: Duration::from_secs(86_400),
        }
    }
}

/// Master configuration. All values are required; there is no implicit
/// environment fallback here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripweaveConfig {
    pub taste_graph: TasteGraphConfig,
    pub maps: MapsConfig,
    pub textgen: TextGenConfig,
    pub ttl: CacheTtlConfig,
    /// Per-provider-call timeout. Independent of any aggregator deadline.
    pub provider_timeout: Duration,
}
