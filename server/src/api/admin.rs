use crate::api::{error_response, store_error_response, ErrorResponse};
use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tastetrack_core::Recipe;
use utoipa::{OpenApi, ToSchema};

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Returns the router for /api/admin endpoints (mounted at /api/admin)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/clear", post(clear_recipes))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub removed: usize,
}

/// Plain equality against the configured secret. No secret configured means
/// no admin access at all.
fn authorized(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(expected) = state.admin_secret.as_deref() else {
        return false;
    };
    headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|given| given == expected)
}

fn forbidden() -> Response {
    error_response(StatusCode::FORBIDDEN, "Admin access denied")
}

/// Every stored recipe
#[utoipa::path(
    get,
    path = "/api/admin/recipes",
    tag = "admin",
    params(("x-admin-secret" = String, Header, description = "Admin secret")),
    responses(
        (status = 200, description = "All stored recipes", body = Vec<Recipe>),
        (status = 403, description = "Missing or wrong secret", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_recipes(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return forbidden();
    }
    match state.store.all() {
        Ok(recipes) => Json(recipes).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// Delete every stored recipe
#[utoipa::path(
    post,
    path = "/api/admin/clear",
    tag = "admin",
    params(("x-admin-secret" = String, Header, description = "Admin secret")),
    responses(
        (status = 200, description = "Recipes removed", body = ClearResponse),
        (status = 403, description = "Missing or wrong secret", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn clear_recipes(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return forbidden();
    }
    match state.store.clear() {
        Ok(removed) => {
            tracing::info!(removed, "Recipe store cleared");
            Json(ClearResponse { removed }).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(list_recipes, clear_recipes),
    components(schemas(ClearResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, state};
    use axum::http::HeaderValue;
    use std::sync::Arc;
    use tastetrack_core::{FakeProvider, RecipeSource};

    fn headers(secret: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_SECRET_HEADER, HeaderValue::from_str(secret).unwrap());
        headers
    }

    fn seed(state: &AppState) {
        state
            .store
            .upsert(&Recipe {
                title: "Lemon Rice".to_string(),
                ingredients: vec!["rice".to_string()],
                steps: vec!["Cook".to_string()],
                mood: "Happy".to_string(),
                weather: "Clear".to_string(),
                source: RecipeSource::Generated,
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_wrong_secret_forbidden() {
        let (state, _dir) = state(FakeProvider::new());
        seed(&state);

        let response = clear_recipes(State(state.clone()), headers("guess")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = list_recipes(State(state.clone()), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(state.store.all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unset_secret_disables_admin() {
        let (state, _dir) = state(FakeProvider::new());
        let mut ctx = Arc::into_inner(state).unwrap();
        ctx.admin_secret = None;
        let response = list_recipes(State(Arc::new(ctx)), headers("")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_then_clear() {
        let (state, _dir) = state(FakeProvider::new());
        seed(&state);

        let listed: Vec<Recipe> = body_json(list_recipes(State(state.clone()), headers("letmein")).await).await;
        assert_eq!(listed.len(), 1);

        let cleared: ClearResponse = body_json(clear_recipes(State(state.clone()), headers("letmein")).await).await;
        assert_eq!(cleared.removed, 1);
        assert!(state.store.all().unwrap().is_empty());
    }
}
