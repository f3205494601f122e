use crate::api::{error_response, store_error_response, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tastetrack_core::FeedbackEvent;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub recipe_title: String,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub recipe_title: String,
    pub liked: bool,
}

/// Record a like or dislike for a recipe title
///
/// The title is not checked against stored recipes.
#[utoipa::path(
    post,
    path = "/api/recipes/feedback",
    tag = "recipes",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackResponse),
        (status = 400, description = "Empty title", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn record_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Response {
    let title = request.recipe_title.trim();
    if title.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Recipe title cannot be empty");
    }

    let event = FeedbackEvent {
        recipe_title: title.to_string(),
        liked: request.liked,
    };
    if let Err(e) = state.store.record_feedback(&event) {
        return store_error_response(&e);
    }
    tracing::info!(recipe = %event.recipe_title, liked = event.liked, "Feedback recorded");

    (
        StatusCode::CREATED,
        Json(FeedbackResponse {
            recipe_title: event.recipe_title,
            liked: event.liked,
        }),
    )
        .into_response()
}
