pub mod admin;
pub mod analytics;
pub mod recipes;
pub mod relay;
pub mod sensor;
pub mod weather;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tastetrack_core::{ExternalCallError, LedgerError, StoreError, SuggestError};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// 503 for a collaborator that has no credentials configured.
pub fn unavailable(what: &str) -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        format!("{} is not configured", what),
    )
}

pub fn external_error_response(err: &ExternalCallError) -> Response {
    tracing::warn!(service = %err.service(), "External call failed: {}", err);
    let status = match err {
        ExternalCallError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::BAD_GATEWAY,
    };
    error_response(status, err.to_string())
}

pub fn store_error_response(err: &StoreError) -> Response {
    tracing::error!("Recipe store failed: {}", err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Recipe store unavailable")
}

pub fn ledger_error_response(err: &LedgerError) -> Response {
    tracing::error!("Vote ledger failed: {}", err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Vote ledger unavailable")
}

pub fn suggest_error_response(err: &SuggestError) -> Response {
    match err {
        SuggestError::EmptyMood => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        SuggestError::Format(e) => {
            tracing::warn!("Model output unusable: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        SuggestError::External(e) => external_error_response(e),
        SuggestError::Store(e) => store_error_response(e),
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "tastetrack", description = "Mood, weather and activity driven recipe suggestions"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        weather::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        sensor::ApiDoc::openapi(),
        analytics::ApiDoc::openapi(),
        admin::ApiDoc::openapi(),
        relay::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::response::Response;
    use serde::de::DeserializeOwned;
    use tastetrack_core::fitness::StaticFitness;
    use tastetrack_core::weather::StaticWeather;
    use tastetrack_core::{
        CsvVoteLedger, FakeProvider, FitnessSnapshot, GenerateOptions, MemoryRecipeStore, Place,
        WeatherReading,
    };
    use tempfile::TempDir;

    use crate::state::{AppContext, AppState, LatestContext, LatestReport};

    pub const THREE_RECIPES: &str = r#"[
        {"title": "Lemon Rice", "ingredients": ["rice", "lemon"], "steps": ["Step 1: Cook rice", "Step 2: Add lemon"]},
        {"title": "Mango Lassi", "ingredients": [{"qty": "2", "item": "mangoes"}], "steps": ["Blend"]},
        {"title": "Iced Tea", "ingredients": ["tea"], "steps": ["Brew", "Chill"]}
    ]"#;

    pub fn clear_weather() -> WeatherReading {
        WeatherReading {
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            temperature_celsius: 31.0,
            icon: Some("01d".to_string()),
        }
    }

    pub fn pune() -> Place {
        Place {
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            country: "IN".to_string(),
        }
    }

    pub fn active_day() -> FitnessSnapshot {
        FitnessSnapshot {
            steps: 9000,
            active_minutes: 45,
            calories_burned: 2100.0,
            heart_points: 20.0,
        }
    }

    /// A fully wired state with fakes. The temp dir owns the vote ledger file.
    pub fn state(provider: FakeProvider) -> (AppState, TempDir) {
        let dir = TempDir::new().unwrap();
        let ledger = CsvVoteLedger::open(dir.path().join("votes.csv")).unwrap();
        let ctx = AppContext {
            provider: Arc::new(provider),
            store: Arc::new(MemoryRecipeStore::new()),
            ledger: Arc::new(ledger),
            weather: Some(Arc::new(StaticWeather {
                reading: Some(clear_weather()),
                place: Some(pune()),
            })),
            fitness: Some(Arc::new(StaticFitness(Some(active_day())))),
            latest: LatestReport::default(),
            last_context: LatestContext::default(),
            admin_secret: Some("letmein".to_string()),
            options: GenerateOptions { enrich: false },
        };
        (Arc::new(ctx), dir)
    }

    pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tastetrack_core::{FormatError, Service};

    #[test]
    fn test_openapi_lists_all_paths() {
        let spec = openapi();
        for path in [
            "/api/weather",
            "/api/recipes/suggest",
            "/api/recipes/feedback",
            "/api/sensor/recipes",
            "/api/sensor/votes",
            "/api/analytics/feedback",
            "/api/analytics/accuracy",
            "/api/admin/recipes",
            "/api/admin/clear",
            "/location",
            "/latest",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            suggest_error_response(&SuggestError::EmptyMood).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            suggest_error_response(&SuggestError::Format(FormatError::NoRecipes)).status(),
            StatusCode::BAD_GATEWAY
        );
        let not_configured = ExternalCallError::NotConfigured {
            service: Service::LanguageModel,
            message: "no key".to_string(),
        };
        assert_eq!(
            external_error_response(&not_configured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            store_error_response(&StoreError::Poisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
