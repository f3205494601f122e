//! Best-effort enrichment of canonical recipes.
//!
//! A second model call asks for realistic quantities and more descriptive
//! steps. Any failure leaves the recipe exactly as it was.

use serde_json::Value;

use crate::error::EnrichmentFailure;
use crate::llm::LlmProvider;
use crate::normalize::{canonical_step, normalize_ingredient, RawEntry};
use crate::parse::{extract_json, ExpectedShape};
use crate::recipe::Recipe;

/// Build the enrichment prompt for a recipe.
pub fn build_prompt(recipe: &Recipe) -> String {
    format!(
        r#"Improve and enrich the following recipe for a professional cookbook.
- Add realistic quantities and make steps descriptive.
- Return JSON strictly: {{ "ingredients": [...], "steps": [...] }}

Title: {title}
Ingredients: {ingredients}
Steps: {steps}
"#,
        title = recipe.title,
        ingredients = recipe.ingredients.join(", "),
        steps = recipe.steps.join(", "),
    )
}

/// Parse the model's answer and apply it to `original`.
///
/// Starts from `original.clone()` and only replaces ingredients and steps.
pub fn apply_response(original: &Recipe, response: &str) -> Result<Recipe, EnrichmentFailure> {
    let value = extract_json(response, ExpectedShape::Object)?;

    let ingredients = list_field(&value, "ingredients")?;
    let steps = list_field(&value, "steps")?;

    if (ingredients.is_empty() && !original.ingredients.is_empty())
        || (steps.is_empty() && !original.steps.is_empty())
    {
        return Err(EnrichmentFailure::MalformedShape(
            "enrichment produced an empty list".to_string(),
        ));
    }

    let mut enriched = original.clone();
    enriched.ingredients = ingredients.iter().map(normalize_ingredient).collect();
    enriched.steps = steps.iter().map(canonical_step).collect();
    Ok(enriched)
}

/// Run the full enrichment (build prompt, call model, apply response).
pub async fn enrich(provider: &dyn LlmProvider, recipe: &Recipe) -> Result<Recipe, EnrichmentFailure> {
    let prompt = build_prompt(recipe);
    let response = provider.complete(&prompt).await?;
    apply_response(recipe, &response)
}

/// Enrich, or fall back to the unmodified recipe on any failure.
pub async fn enrich_or_keep(provider: &dyn LlmProvider, recipe: Recipe) -> Recipe {
    match enrich(provider, &recipe).await {
        Ok(enriched) => enriched,
        Err(e) => {
            tracing::warn!(
                title = %recipe.title,
                error = %e,
                "Enrichment failed, keeping original recipe"
            );
            recipe
        }
    }
}

fn list_field(value: &Value, field: &str) -> Result<Vec<RawEntry>, EnrichmentFailure> {
    match value.get(field) {
        Some(Value::Array(items)) => Ok(items.iter().cloned().map(RawEntry::from).collect()),
        Some(_) => Err(EnrichmentFailure::MalformedShape(format!(
            "`{}` is not an array",
            field
        ))),
        None => Err(EnrichmentFailure::MalformedShape(format!(
            "missing `{}`",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;
    use crate::recipe::RecipeSource;

    fn sample_recipe() -> Recipe {
        Recipe {
            title: "Pancakes".to_string(),
            ingredients: vec!["flour".to_string(), "milk".to_string()],
            steps: vec!["Mix".to_string(), "Fry".to_string()],
            mood: "Happy".to_string(),
            weather: "Clear".to_string(),
            source: RecipeSource::Generated,
        }
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt(&sample_recipe());
        assert!(prompt.contains("Title: Pancakes"));
        assert!(prompt.contains("Ingredients: flour, milk"));
        assert!(prompt.contains("Steps: Mix, Fry"));
        assert!(prompt.contains(r#"{ "ingredients": [...], "steps": [...] }"#));
    }

    #[test]
    fn test_apply_response_normalizes() {
        let response = r#"Sure! {"ingredients": [{"quantity": "200 g", "name": "flour"}, "300 ml milk"],
            "steps": ["Step 1: Step 1: Whisk until smooth", {"action": "Fry.", "details": "2 minutes per side"}]}"#;

        let enriched = apply_response(&sample_recipe(), response).unwrap();
        assert_eq!(enriched.title, "Pancakes");
        assert_eq!(enriched.ingredients, vec!["200 g flour", "300 ml milk"]);
        assert_eq!(enriched.steps, vec!["Whisk until smooth", "Fry. 2 minutes per side"]);
        assert_eq!(enriched.mood, "Happy");
        assert_eq!(enriched.source, RecipeSource::Generated);
    }

    #[test]
    fn test_apply_response_missing_field() {
        let result = apply_response(&sample_recipe(), r#"{"ingredients": ["a"]}"#);
        assert!(matches!(result, Err(EnrichmentFailure::MalformedShape(_))));
    }

    #[test]
    fn test_apply_response_wrong_type() {
        let result = apply_response(&sample_recipe(), r#"{"ingredients": "a", "steps": []}"#);
        assert!(matches!(result, Err(EnrichmentFailure::MalformedShape(_))));
    }

    #[test]
    fn test_apply_response_empty_lists_rejected() {
        let result = apply_response(&sample_recipe(), r#"{"ingredients": [], "steps": []}"#);
        assert!(matches!(result, Err(EnrichmentFailure::MalformedShape(_))));
    }

    #[test]
    fn test_apply_response_not_json() {
        let result = apply_response(&sample_recipe(), "I'd rather not.");
        assert!(matches!(result, Err(EnrichmentFailure::Format(_))));
    }

    #[tokio::test]
    async fn test_enrich_or_keep_on_call_failure() {
        let provider = FakeProvider::new();
        provider.add_failure("Improve and enrich", "timeout");

        let original = sample_recipe();
        let result = enrich_or_keep(&provider, original.clone()).await;
        assert_eq!(result, original);
    }

    #[tokio::test]
    async fn test_enrich_or_keep_on_garbage() {
        let provider = FakeProvider::new().with_default_response("{\"ingredients\": oops");
        let original = sample_recipe();
        assert_eq!(enrich_or_keep(&provider, original.clone()).await, original);
    }

    #[tokio::test]
    async fn test_enrich_success() {
        let provider = FakeProvider::with_response(
            "professional cookbook",
            r#"{"ingredients": ["1 cup flour", "1 cup milk"], "steps": ["Mix well", "Fry on medium heat"]}"#,
        );
        let enriched = enrich(&provider, &sample_recipe()).await.unwrap();
        assert_eq!(enriched.ingredients, vec!["1 cup flour", "1 cup milk"]);
        assert_eq!(enriched.steps[1], "Fry on medium heat");
    }
}
