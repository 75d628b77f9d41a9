//! Text-generation HTTP client.

mod types;

use crate::{decode_error, transport_error, TextGenerator};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tripweave_core::{ProviderError, TextGenConfig};
use types::{ApiError, Message, MessageRequest, MessageResponse};

const PROVIDER: &str = "textgen";

/// Generation requests run noticeably longer than the other providers.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(45);

/// Client for the text-generation messages API.
pub struct TextGenClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: i32,
    temperature: f32,
}

impl TextGenClient {
    pub fn new(config: &TextGenConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

impl std::fmt::Debug for TextGenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextGenClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TextGenerator for TextGenClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = MessageRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(GENERATE_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        let status = response.status();
        if status.is_success() {
            let parsed: MessageResponse =
                response.json().await.map_err(|e| decode_error(PROVIDER, e))?;
            return Ok(parsed.text());
        }

        let error_text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiError>(&error_text)
            .map(|api| api.error.message)
            .unwrap_or(error_text);

        Err(match status {
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::Timeout {
                    provider: PROVIDER.to_string(),
                    detail,
                }
            }
            _ => ProviderError::UpstreamRejected {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                detail,
            },
        })
    }
}
