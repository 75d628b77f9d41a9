//! Taste-graph API response types

use serde::Deserialize;
use tripweave_core::RecommendationItem;

const GENRE_TAG: &str = "urn:tag:genre";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub entity_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub results: Vec<RecommendedEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendedEntity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<EntityTag>,
    #[serde(default)]
    pub query: Option<QueryInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityTag {
    #[serde(default, rename = "type")]
    pub tag_type: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryInfo {
    #[serde(default)]
    pub affinity: Option<f64>,
}

impl RecommendedEntity {
    /// Collapse the wire entity into the domain item: keep the name, pull
    /// genre names out of the tag list, carry the affinity score through.
    pub fn into_item(self) -> RecommendationItem {
        let genres = self
            .tags
            .into_iter()
            .filter(|tag| tag.tag_type == GENRE_TAG)
            .map(|tag| tag.name)
            .collect();
        RecommendationItem {
            name: self.name,
            genres,
            score: self.query.and_then(|q| q.affinity),
        }
    }
}
