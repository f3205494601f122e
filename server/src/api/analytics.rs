use crate::api::{ledger_error_response, store_error_response, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tastetrack_core::{AccuracySummary, CuisineCount, FeedbackSummary};
use utoipa::OpenApi;

/// Returns the router for /api/analytics endpoints (mounted at /api/analytics)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedback", get(feedback_summary))
        .route("/accuracy", get(accuracy_summary))
}

/// Like/dislike totals
#[utoipa::path(
    get,
    path = "/api/analytics/feedback",
    tag = "analytics",
    responses(
        (status = 200, description = "Feedback totals", body = FeedbackSummary),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn feedback_summary(State(state): State<AppState>) -> Response {
    match state.store.feedback() {
        Ok(events) => Json(FeedbackSummary::from_events(&events)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// How often users picked the model's first suggestion
#[utoipa::path(
    get,
    path = "/api/analytics/accuracy",
    tag = "analytics",
    responses(
        (status = 200, description = "Vote ledger summary", body = AccuracySummary),
        (status = 500, description = "Ledger failure", body = ErrorResponse)
    )
)]
pub async fn accuracy_summary(State(state): State<AppState>) -> Response {
    match state.ledger.records() {
        Ok(votes) => Json(AccuracySummary::from_votes(&votes)).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(feedback_summary, accuracy_summary),
    components(schemas(FeedbackSummary, AccuracySummary, CuisineCount))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, state};
    use chrono::Utc;
    use tastetrack_core::{FakeProvider, FeedbackEvent, Rank, SensorSnapshot, VoteRecord};

    #[tokio::test]
    async fn test_empty_summaries() {
        let (state, _dir) = state(FakeProvider::new());

        let feedback: FeedbackSummary = body_json(feedback_summary(State(state.clone())).await).await;
        assert_eq!(feedback, FeedbackSummary::default());

        let accuracy: AccuracySummary = body_json(accuracy_summary(State(state)).await).await;
        assert_eq!(accuracy.total_votes, 0);
        assert_eq!(accuracy.rank1_percent, 0.0);
    }

    #[tokio::test]
    async fn test_summaries_reflect_records() {
        let (state, _dir) = state(FakeProvider::new());
        for liked in [true, true, false] {
            state
                .store
                .record_feedback(&FeedbackEvent {
                    recipe_title: "Poha".to_string(),
                    liked,
                })
                .unwrap();
        }
        for rank in [1, 1, 3] {
            state
                .ledger
                .append(&VoteRecord {
                    recipe_title: "Poha".to_string(),
                    rank: Rank::try_from(rank).unwrap(),
                    sensor: SensorSnapshot {
                        steps: 100,
                        active_minutes: 1,
                        calories: 10.0,
                        heart_points: 0.0,
                        temperature: 25.0,
                        condition: "Clear".to_string(),
                    },
                    cuisine_used: "IN".to_string(),
                    country: "IN".to_string(),
                    city: "Pune".to_string(),
                    timestamp: Utc::now(),
                })
                .unwrap();
        }

        let feedback: FeedbackSummary = body_json(feedback_summary(State(state.clone())).await).await;
        assert_eq!(feedback.liked, 2);
        assert_eq!(feedback.disliked, 1);

        let accuracy: AccuracySummary = body_json(accuracy_summary(State(state)).await).await;
        assert_eq!(accuracy.total_votes, 3);
        assert_eq!(accuracy.rank_counts, vec![2, 0, 1]);
        assert_eq!(accuracy.top_cuisines[0].votes, 3);
    }
}
