//! The activity planner: taste aggregate + environmental context in, one
//! generation call out.

use crate::context::ContextService;
use crate::prompt;
use crate::taste::TasteService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tripweave_core::{
    GenerationError, PreferenceSet, TripweaveResult, ValidationError,
};
use tripweave_providers::TextGenerator;

/// Recommendations requested per category when building the profile.
const PROFILE_LIMIT: u32 = 5;

/// Destination recommendations requested for the itinerary cities.
const CITY_LIMIT: u32 = 3;

/// Most options one request may ask for.
const MAX_OPTION_COUNT: u32 = 10;

/// One activity-options request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRequest {
    pub destination: String,
    /// Days from today, 0 = today.
    pub day_offset: u8,
    pub preferences: PreferenceSet,
    pub option_count: u32,
}

impl ActivityRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.destination.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "destination".to_string(),
            });
        }
        if self.option_count == 0 || self.option_count > MAX_OPTION_COUNT {
            return Err(ValidationError::InvalidValue {
                field: "option_count".to_string(),
                reason: format!("must be between 1 and {}", MAX_OPTION_COUNT),
            });
        }
        Ok(())
    }
}

/// One generated activity suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOption {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indoor: Option<bool>,
}

/// The parsed generation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOptions {
    pub options: Vec<ActivityOption>,
}

/// Runs the full planning pipeline for one request.
pub struct ActivityPlanner {
    taste: TasteService,
    context: ContextService,
    generator: Arc<dyn TextGenerator>,
}

impl ActivityPlanner {
    pub fn new(
        taste: TasteService,
        context: ContextService,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            taste,
            context,
            generator,
        }
    }

    /// Activity options for one destination and day. The taste aggregate
    /// is all-or-nothing; environmental signals degrade gracefully; the
    /// generation call runs exactly once and its output must parse.
    pub async fn plan(&self, request: &ActivityRequest) -> TripweaveResult<ActivityOptions> {
        request.validate()?;

        let tastes = self
            .taste
            .aggregate(&request.preferences, PROFILE_LIMIT)
            .await?;
        let context = self
            .context
            .collect(&request.destination, request.day_offset)
            .await?;

        let prompt = prompt::activity_prompt(
            &request.destination,
            &tastes,
            &context,
            request.option_count,
        );
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(GenerationError::Provider)?;
        Ok(parse_options(&raw)?)
    }

    /// Same-day options across an itinerary of cities.
    pub async fn today(
        &self,
        cities: &[String],
        preferences: &PreferenceSet,
        option_count: u32,
    ) -> TripweaveResult<ActivityOptions> {
        if option_count == 0 || option_count > MAX_OPTION_COUNT {
            return Err(ValidationError::InvalidValue {
                field: "option_count".to_string(),
                reason: format!("must be between 1 and {}", MAX_OPTION_COUNT),
            }
            .into());
        }

        let tastes = self.taste.aggregate(preferences, PROFILE_LIMIT).await?;
        let similar = self.taste.city_recommendations(cities, CITY_LIMIT).await?;

        let prompt = prompt::today_prompt(cities, &tastes, &similar, option_count);
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(GenerationError::Provider)?;
        Ok(parse_options(&raw)?)
    }
}

/// Parse the generator's answer into `ActivityOptions`.
///
/// Generators sometimes wrap the document in a markdown code fence;
/// fences are stripped before parsing. Anything that does not decode to
/// a non-empty options list is malformed output.
fn parse_options(raw: &str) -> Result<ActivityOptions, GenerationError> {
    let trimmed = strip_fence(raw.trim());
    let parsed: ActivityOptions =
        serde_json::from_str(trimmed).map_err(|e| GenerationError::MalformedOutput {
            reason: e.to_string(),
        })?;
    if parsed.options.is_empty() {
        return Err(GenerationError::MalformedOutput {
            reason: "options list is empty".to_string(),
        });
    }
    Ok(parsed)
}

fn strip_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
