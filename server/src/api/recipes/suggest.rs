use crate::api::{external_error_response, suggest_error_response, unavailable, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tastetrack_core::{suggest_for_mood, MoodBucket, Recipe, RecipeSource, SuggestError, WeatherQuery};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SuggestRequest {
    pub mood: String,
    /// Weather condition to bucket by, e.g. "Clear". Takes precedence over `city`.
    #[serde(default)]
    pub weather: Option<String>,
    /// City to look the current condition up for.
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuggestResponse {
    pub source: RecipeSource,
    pub mood: String,
    pub weather: String,
    pub recipes: Vec<Recipe>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Suggest recipes for a mood and weather
///
/// Serves the stored recipes for the (mood, weather) bucket when there are
/// any, otherwise asks the model for three and stores them.
#[utoipa::path(
    post,
    path = "/api/recipes/suggest",
    tag = "recipes",
    request_body = SuggestRequest,
    responses(
        (status = 200, description = "Recipes for the bucket", body = SuggestResponse),
        (status = 400, description = "Empty mood", body = ErrorResponse),
        (status = 502, description = "Model or weather service failed, or model output unusable", body = ErrorResponse),
        (status = 503, description = "Weather service not configured", body = ErrorResponse)
    )
)]
pub async fn suggest_recipes(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Response {
    let mood = request.mood.trim();
    if mood.is_empty() {
        return suggest_error_response(&SuggestError::EmptyMood);
    }

    let weather = match (non_blank(&request.weather), non_blank(&request.city)) {
        (Some(condition), _) => condition.to_string(),
        (None, Some(city)) => {
            let Some(lookup) = state.weather.as_ref() else {
                return unavailable("Weather service");
            };
            match lookup.current(&WeatherQuery::City(city.to_string())).await {
                Ok(reading) => reading.condition,
                Err(e) => return external_error_response(&e),
            }
        }
        (None, None) => String::new(),
    };

    let bucket = MoodBucket::new(mood, weather);
    match suggest_for_mood(
        state.provider.as_ref(),
        state.store.as_ref(),
        &bucket,
        state.options,
    )
    .await
    {
        Ok(suggestions) => Json(SuggestResponse {
            source: suggestions.source,
            mood: bucket.mood,
            weather: bucket.weather,
            recipes: suggestions.recipes,
        })
        .into_response(),
        Err(e) => suggest_error_response(&e),
    }
}
