//! Taste-graph HTTP client.

mod types;

use crate::{decode_error, transport_error, TasteGraph};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tripweave_core::{
    EntityKind, ProviderError, RecommendationItem, TasteGraphConfig,
};
use types::{RecommendationsResponse, SearchResponse};

const PROVIDER: &str = "taste-graph";

/// Client for the cultural taste-graph API.
pub struct TasteGraphClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl TasteGraphClient {
    pub fn new(config: &TasteGraphConfig, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

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
}

impl std::fmt::Debug for TasteGraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasteGraphClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TasteGraph for TasteGraphClient {
    async fn search(
        &self,
        name: &str,
        kind: EntityKind,
    ) -> Result<Option<String>, ProviderError> {
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("query", name.to_string()),
                    ("types", kind.urn().to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|hit| hit.entity_id)
            .find(|id| !id.is_empty()))
    }

    async fn recommendations(
        &self,
        entity_id: &str,
        kind: EntityKind,
        limit: u32,
    ) -> Result<Vec<RecommendationItem>, ProviderError> {
        let response: RecommendationsResponse = self
            .get_json(
                "recommendations",
                &[
                    ("entity_ids", entity_id.to_string()),
                    ("type", kind.urn().to_string()),
                    ("take", limit.to_string()),
                ],
            )
            .await?;

        Ok(response
            .results
            .into_iter()
            .map(|entity| entity.into_item())
            .collect())
    }
}
