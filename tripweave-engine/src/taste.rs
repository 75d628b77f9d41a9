//! Taste-graph aggregation: one fan-out per preference set, one
//! sub-request per non-empty category, all-or-nothing.

use crate::fanout::{fan_out, require_all, SubOperation};
use crate::reduce::reduce;
use std::sync::Arc;
use tracing::warn;
use tripweave_core::{
    AggregateResult, Category, EntityKind, ProviderError, RecommendationItem, SubRequest,
    TripweaveError, ValidationError,
};
use tripweave_providers::TasteGraph;

/// Recommendations requested per seed item before merge-reduction.
const PER_SEED_LIMIT: u32 = 10;

/// All-or-nothing aggregation over the taste graph.
pub struct TasteService {
    provider: Arc<dyn TasteGraph>,
}

impl TasteService {
    pub fn new(provider: Arc<dyn TasteGraph>) -> Self {
        Self { provider }
    }

    /// Aggregate recommendations for every non-empty category of the
    /// preference set. Any category failure fails the whole aggregate;
    /// no partial data is returned.
    pub async fn aggregate(
        &self,
        preferences: &tripweave_core::PreferenceSet,
        limit: u32,
    ) -> Result<AggregateResult, TripweaveError> {
        if preferences.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "preferences".to_string(),
            }
            .into());
        }

        let mut requests: Vec<SubRequest> = Vec::new();
        for (category, items) in preferences.non_empty() {
            requests.push(SubRequest::new(category, items.to_vec(), limit)?);
        }

        let operations: Vec<(String, SubOperation<'_, Vec<RecommendationItem>>)> = requests
            .into_iter()
            .map(|request| {
                let name = request.category().as_str().to_string();
                let op: SubOperation<'_, Vec<RecommendationItem>> =
                    Box::pin(self.category_recommendations(request));
                (name, op)
            })
            .collect();

        let joined = fan_out(operations).await;
        let per_name = require_all(joined)?;

        let mut result = AggregateResult::default();
        for (name, items) in per_name {
            if let Some(category) = Category::parse(&name) {
                result.per_category.insert(category, items);
            }
        }
        Ok(result)
    }

    /// Destination recommendations seeded by a list of city names.
    ///
    /// The list is cleaned first (trimmed, blanks dropped); an empty
    /// cleaned list is a validation error, not an upstream call.
    pub async fn city_recommendations(
        &self,
        cities: &[String],
        limit: u32,
    ) -> Result<Vec<RecommendationItem>, TripweaveError> {
        let cleaned: Vec<String> = cities
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if cleaned.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "cities".to_string(),
            }
            .into());
        }

        let collected = self
            .seed_recommendations(&cleaned, EntityKind::Destination, limit)
            .await?;
        Ok(reduce(collected, &cleaned))
    }

    /// One category sub-request: resolve and query each seed item in
    /// turn, flatten, then merge-reduce against the seeds.
    async fn category_recommendations(
        &self,
        request: SubRequest,
    ) -> Result<Vec<RecommendationItem>, ProviderError> {
        let kind = request.category().entity_kind();
        let collected = self
            .seed_recommendations(request.items(), kind, request.limit())
            .await?;
        Ok(reduce(collected, request.items()))
    }

    async fn seed_recommendations(
        &self,
        seeds: &[String],
        kind: EntityKind,
        limit: u32,
    ) -> Result<Vec<RecommendationItem>, ProviderError> {
        let per_seed = limit.min(PER_SEED_LIMIT).max(1);
        let mut collected = Vec::new();
        for seed in seeds {
            let Some(entity_id) = self.provider.search(seed, kind).await? else {
                warn!(seed = %seed, kind = ?kind, "seed item not found in taste graph, skipping");
                continue;
            };
            let mut items = self
                .provider
                .recommendations(&entity_id, kind, per_seed)
                .await?;
            collected.append(&mut items);
        }
        Ok(collected)
    }
}
