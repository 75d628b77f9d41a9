//! Prompt assembly for the generation call.
//!
//! Pure string building over the merged context bundle. The generator is
//! instructed to answer with a strict JSON document; parsing of that
//! answer lives in the planner.

use crate::context::EnvironmentContext;
use tripweave_core::{AggregateResult, RecommendationItem};

const OUTPUT_CONTRACT: &str = "Respond with JSON only, no prose before or after, in the shape \
{\"options\": [{\"title\": string, \"description\": string, \"category\": string, \
\"indoor\": boolean}]}.";

/// Prompt for destination activity options: taste profile plus the
/// environmental bundle for the target day.
pub fn activity_prompt(
    destination: &str,
    tastes: &AggregateResult,
    context: &EnvironmentContext,
    option_count: u32,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "You are a travel activity planner. Suggest {} activity options in {} \
for the visitor described below.\n\n",
        option_count, destination
    ));

    push_taste_profile(&mut prompt, tastes);
    push_environment(&mut prompt, context);

    prompt.push_str("\nPrefer activities that fit the conditions above and the visitor's \
tastes. ");
    prompt.push_str(OUTPUT_CONTRACT);
    prompt
}

/// Prompt for same-day options across an itinerary: taste profile plus
/// destination recommendations seeded by the itinerary cities.
pub fn today_prompt(
    cities: &[String],
    tastes: &AggregateResult,
    city_recommendations: &[RecommendationItem],
    option_count: u32,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "You are a travel activity planner. The visitor is touring {} today. \
Suggest {} options for the day.\n\n",
        cities.join(", "),
        option_count
    ));

    push_taste_profile(&mut prompt, tastes);

    if !city_recommendations.is_empty() {
        prompt.push_str("Destinations similar to this itinerary:\n");
        for item in city_recommendations {
            prompt.push_str(&format!("- {}\n", item.name));
        }
        prompt.push('\n');
    }

    prompt.push_str(OUTPUT_CONTRACT);
    prompt
}

fn push_taste_profile(prompt: &mut String, tastes: &AggregateResult) {
    if tastes.per_category.is_empty() {
        return;
    }
    prompt.push_str("Visitor taste profile (recommendations per category):\n");
    for (category, items) in &tastes.per_category {
        if items.is_empty() {
            continue;
        }
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        prompt.push_str(&format!("- {}: {}\n", category, names.join(", ")));
    }
    prompt.push('\n');
}

fn push_environment(prompt: &mut String, context: &EnvironmentContext) {
    prompt.push_str(&format!(
        "Conditions {} day(s) from now:\n",
        context.day_offset
    ));

    match &context.weather {
        Some(weather) => {
            let condition = weather
                .daytime
                .condition
                .as_deref()
                .unwrap_or("unknown conditions");
            let range = match (weather.min_temperature, weather.max_temperature) {
                (Some(min), Some(max)) => format!("{:.0}-{:.0} {}", min, max, weather.temperature_unit),
                _ => "temperature unavailable".to_string(),
            };
            prompt.push_str(&format!("- weather: {}, {}\n", condition, range));
        }
        None => prompt.push_str("- weather: unavailable\n"),
    }

    match &context.air_quality {
        Some(air) => prompt.push_str(&format!(
            "- air quality: average AQI {} (range {}-{})\n",
            air.average_aqi, air.min_aqi, air.max_aqi
        )),
        None => prompt.push_str("- air quality: unavailable\n"),
    }

    if let Some(pollen) = &context.pollen {
        prompt.push_str(&format!(
            "- pollen: level {} overall, worst type {}\n",
            pollen.overall_level, pollen.worst_type
        ));
    }

    if !context.venues.is_empty() {
        prompt.push_str("- nearby cultural venues:\n");
        for venue in &context.venues {
            prompt.push_str(&format!(
                "  - {} ({}, rated {:.1})\n",
                venue.name, venue.address, venue.rating
            ));
        }
    }
}
