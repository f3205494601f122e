pub mod feedback;
pub mod suggest;

use crate::state::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suggest", post(suggest::suggest_recipes))
        .route("/feedback", post(feedback::record_feedback))
}

#[derive(OpenApi)]
#[openapi(
    paths(suggest::suggest_recipes, feedback::record_feedback),
    components(schemas(
        suggest::SuggestRequest,
        suggest::SuggestResponse,
        feedback::FeedbackRequest,
        feedback::FeedbackResponse,
        tastetrack_core::Recipe,
        tastetrack_core::RecipeSource,
    ))
)]
pub struct ApiDoc;
