use crate::api::{error_response, ledger_error_response, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tastetrack_core::{Rank, SensorContext, SensorSnapshot, VoteRecord};
use utoipa::ToSchema;

const NO_CONTEXT: &str = "Get sensor recipes before voting";

/// Omitted context fields are taken from the last sensor top three.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoteRequest {
    pub recipe_title: String,
    /// Position the voted recipe had in the list, 1-3.
    pub rank: Rank,
    #[serde(default)]
    pub sensor: Option<SensorSnapshot>,
    #[serde(default)]
    pub cuisine_used: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Record which of the three sensor recipes the user picked
#[utoipa::path(
    post,
    path = "/api/sensor/votes",
    tag = "sensor",
    request_body = VoteRequest,
    responses(
        (status = 201, description = "Vote appended to the ledger", body = VoteRecord),
        (status = 400, description = "Empty title", body = ErrorResponse),
        (status = 409, description = "No sensor snapshot given and no sensor recipes generated yet", body = ErrorResponse),
        (status = 500, description = "Ledger failure", body = ErrorResponse)
    )
)]
pub async fn record_vote(
    State(state): State<AppState>,
    Json(request): Json<VoteRequest>,
) -> Response {
    if request.recipe_title.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Recipe title cannot be empty");
    }

    let context = state.last_context.get().await;
    let sensor = match (request.sensor, context.as_ref()) {
        (Some(sensor), _) => sensor,
        (None, Some(ctx)) => ctx.snapshot(),
        (None, None) => return error_response(StatusCode::CONFLICT, NO_CONTEXT),
    };
    let context = context.as_ref();

    let record = VoteRecord {
        recipe_title: request.recipe_title.trim().to_string(),
        rank: request.rank,
        sensor,
        cuisine_used: or_context(request.cuisine_used, context, |ctx| &ctx.cuisine),
        country: or_context(request.country, context, |ctx| &ctx.place.country),
        city: or_context(request.city, context, |ctx| &ctx.place.city),
        timestamp: Utc::now(),
    };

    if let Err(e) = state.ledger.append(&record) {
        return ledger_error_response(&e);
    }
    tracing::info!(recipe = %record.recipe_title, rank = record.rank.get(), "Vote recorded");

    (StatusCode::CREATED, Json(record)).into_response()
}

fn or_context(
    field: Option<String>,
    context: Option<&SensorContext>,
    pick: impl Fn(&SensorContext) -> &String,
) -> String {
    field
        .or_else(|| context.map(|ctx| pick(ctx).clone()))
        .unwrap_or_default()
}
