use crate::api::{error_response, external_error_response, suggest_error_response, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tastetrack_core::sensor::{choose_cuisine, explore_more, generate_top_three};
use tastetrack_core::{FitnessSnapshot, FoodCategory, MealTime, Recipe, SensorContext};
use utoipa::ToSchema;

const MISSING_CONTEXT: &str = "Collect fitness data and phone weather first";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SensorRecipesRequest {
    pub category: FoodCategory,
    /// Exact cuisine to use instead of the detected country.
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Today's activity. Collected from the fitness service when omitted.
    #[serde(default)]
    pub fitness: Option<FitnessSnapshot>,
    /// Ask for a different set of three for the same context.
    #[serde(default)]
    pub explore: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SensorRecipesResponse {
    pub context: SensorContext,
    /// Ranked, best match first.
    pub recipes: Vec<Recipe>,
}

/// Top three recipes for the current activity, weather and place
///
/// Uses the latest phone location report for weather and place. Recipes are
/// not stored; the context is kept so a following vote can record it.
#[utoipa::path(
    post,
    path = "/api/sensor/recipes",
    tag = "sensor",
    request_body = SensorRecipesRequest,
    responses(
        (status = 200, description = "Ranked recipes and the context they were built from", body = SensorRecipesResponse),
        (status = 409, description = "No location report or fitness data yet", body = ErrorResponse),
        (status = 502, description = "Model or fitness service failed, or model output unusable", body = ErrorResponse),
        (status = 503, description = "Model not configured", body = ErrorResponse)
    )
)]
pub async fn sensor_recipes(
    State(state): State<AppState>,
    Json(request): Json<SensorRecipesRequest>,
) -> Response {
    let Some(report) = state.latest.get().await else {
        return error_response(StatusCode::CONFLICT, MISSING_CONTEXT);
    };

    let fitness = match (request.fitness, state.fitness.as_ref()) {
        (Some(snapshot), _) => snapshot,
        (None, Some(collector)) => match collector.collect().await {
            Ok(snapshot) => snapshot,
            Err(e) => return external_error_response(&e),
        },
        (None, None) => return error_response(StatusCode::CONFLICT, MISSING_CONTEXT),
    };

    let cuisine = choose_cuisine(request.cuisine.as_deref(), &report.place.country);
    let ctx = SensorContext {
        place: report.place,
        weather: report.weather,
        fitness,
        meal_time: MealTime::now(),
        category: request.category,
        cuisine,
    };

    let result = if request.explore {
        explore_more(state.provider.as_ref(), &ctx, state.options).await
    } else {
        generate_top_three(state.provider.as_ref(), &ctx, state.options).await
    };

    match result {
        Ok(recipes) => {
            state.last_context.set(ctx.clone()).await;
            Json(SensorRecipesResponse {
                context: ctx,
                recipes,
            })
            .into_response()
        }
        Err(e) => suggest_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{active_day, body_json, clear_weather, pune, state, THREE_RECIPES};
    use crate::state::LocationReport;
    use chrono::Utc;
    use std::sync::Arc;
    use tastetrack_core::FakeProvider;

    fn request(cuisine: Option<&str>, explore: bool) -> SensorRecipesRequest {
        SensorRecipesRequest {
            category: FoodCategory::Dinner,
            cuisine: cuisine.map(str::to_string),
            fitness: None,
            explore,
        }
    }

    async fn report(state: &AppState) {
        state
            .latest
            .set(LocationReport {
                lat: 18.52,
                lon: 73.85,
                place: pune(),
                weather: clear_weather(),
                received_at: Utc::now(),
            })
            .await;
    }

    #[tokio::test]
    async fn test_conflict_without_location() {
        let (state, _dir) = state(FakeProvider::new());
        let response = sensor_recipes(State(state), Json(request(None, false))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.error, MISSING_CONTEXT);
    }

    #[tokio::test]
    async fn test_conflict_without_fitness() {
        let (state, _dir) = state(FakeProvider::new());
        let mut ctx = Arc::into_inner(state).unwrap();
        ctx.fitness = None;
        let state = Arc::new(ctx);
        report(&state).await;

        let response = sensor_recipes(State(state), Json(request(None, false))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_top_three_uses_country_and_is_not_stored() {
        let provider = FakeProvider::with_response("GLOBAL smart food recommender", THREE_RECIPES);
        let (state, _dir) = state(provider);
        report(&state).await;

        let response = sensor_recipes(State(state.clone()), Json(request(None, false))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: SensorRecipesResponse = body_json(response).await;

        assert_eq!(body.context.cuisine, "IN");
        assert_eq!(body.context.fitness, active_day());
        assert_eq!(body.recipes.len(), 3);
        assert_eq!(body.recipes[0].mood, "Dinner");
        assert_eq!(body.recipes[0].weather, "Clear");
        assert!(state.store.all().unwrap().is_empty());
        let kept = state.last_context.get().await.unwrap();
        assert_eq!(kept.cuisine, "IN");
        assert_eq!(kept.fitness, active_day());
    }

    #[tokio::test]
    async fn test_explore_uses_override() {
        let provider = FakeProvider::with_response("Suggest 3 different recipes", THREE_RECIPES);
        let (state, _dir) = state(provider);
        report(&state).await;

        let response = sensor_recipes(State(state), Json(request(Some("Italian"), true))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: SensorRecipesResponse = body_json(response).await;
        assert_eq!(body.context.cuisine, "Italian");
        assert_eq!(body.recipes[2].title, "Iced Tea");
    }
}
