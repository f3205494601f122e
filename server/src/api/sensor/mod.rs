pub mod recipes;
pub mod votes;

use crate::state::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/sensor endpoints (mounted at /api/sensor)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(recipes::sensor_recipes))
        .route("/votes", post(votes::record_vote))
}

#[derive(OpenApi)]
#[openapi(
    paths(recipes::sensor_recipes, votes::record_vote),
    components(schemas(
        recipes::SensorRecipesRequest,
        recipes::SensorRecipesResponse,
        votes::VoteRequest,
        tastetrack_core::SensorContext,
        tastetrack_core::FoodCategory,
        tastetrack_core::MealTime,
        tastetrack_core::FitnessSnapshot,
        tastetrack_core::SensorSnapshot,
        tastetrack_core::VoteRecord,
        tastetrack_core::Rank,
        tastetrack_core::Place,
    ))
)]
pub struct ApiDoc;
