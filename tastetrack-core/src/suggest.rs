//! Mood-mode suggestions: serve the stored bucket, or generate and persist.

use serde::{Deserialize, Serialize};

use crate::enrich::enrich_or_keep;
use crate::error::SuggestError;
use crate::llm::LlmProvider;
use crate::parse::{extract_json, ExpectedShape};
use crate::recipe::{decode_recipes, MoodBucket, Recipe, RecipeSource};
use crate::store::RecipeStore;

/// Knobs shared by the generation flows.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Run the best-effort enrichment call for each recipe.
    pub enrich: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { enrich: true }
    }
}

/// Recipes for a bucket and where they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Suggestions {
    pub source: RecipeSource,
    pub recipes: Vec<Recipe>,
}

pub fn mood_prompt(bucket: &MoodBucket) -> String {
    format!(
        "Suggest 3 recipes for mood '{}' and weather '{}'. Return JSON array.",
        bucket.mood, bucket.weather
    )
}

/// Turn a raw model answer into canonical recipes, enriching each if asked.
pub async fn generate_from_prompt(
    provider: &dyn LlmProvider,
    prompt: &str,
    bucket: &MoodBucket,
    options: GenerateOptions,
) -> Result<Vec<Recipe>, SuggestError> {
    let response = provider.complete(prompt).await?;
    let value = extract_json(&response, ExpectedShape::Array)?;
    let raw = decode_recipes(&value)?;

    // A bucket stores one recipe per title, so a repeated title keeps its
    // first position and its last content
    let mut unique: Vec<Recipe> = Vec::with_capacity(raw.len());
    for item in &raw {
        let recipe = item.canonicalize(bucket, RecipeSource::Generated);
        match unique.iter_mut().find(|r| r.title == recipe.title) {
            Some(existing) => {
                tracing::debug!(title = %recipe.title, "Duplicate title in model output");
                *existing = recipe;
            }
            None => unique.push(recipe),
        }
    }

    let mut recipes = Vec::with_capacity(unique.len());
    for recipe in unique {
        let recipe = if options.enrich {
            enrich_or_keep(provider, recipe).await
        } else {
            recipe
        };
        recipes.push(recipe);
    }
    Ok(recipes)
}

/// Cache-then-generate for a mood bucket.
///
/// A stored bucket is served as-is with no staleness check.
pub async fn suggest_for_mood(
    provider: &dyn LlmProvider,
    store: &dyn RecipeStore,
    bucket: &MoodBucket,
    options: GenerateOptions,
) -> Result<Suggestions, SuggestError> {
    if bucket.mood.trim().is_empty() {
        return Err(SuggestError::EmptyMood);
    }

    let cached = store.lookup(bucket)?;
    if !cached.is_empty() {
        tracing::info!(
            mood = %bucket.mood,
            weather = %bucket.weather,
            count = cached.len(),
            "Recipes loaded from store"
        );
        return Ok(Suggestions {
            source: RecipeSource::Cached,
            recipes: cached,
        });
    }

    tracing::info!(mood = %bucket.mood, weather = %bucket.weather, "Store miss, generating recipes");
    let recipes = generate_from_prompt(provider, &mood_prompt(bucket), bucket, options).await?;

    for recipe in &recipes {
        store.upsert(recipe)?;
    }
    tracing::info!(count = recipes.len(), "Generated recipes saved");

    Ok(Suggestions {
        source: RecipeSource::Generated,
        recipes,
    })
}
