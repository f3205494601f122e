use crate::api::{error_response, external_error_response, unavailable, ErrorResponse};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tastetrack_core::{WeatherQuery, WeatherReading};
use utoipa::{IntoParams, OpenApi};

/// Returns the router for /api/weather (mounted at /api/weather)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(current_weather))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeatherParams {
    /// City name, as typed by the user
    pub city: String,
}

/// Current weather for a city
#[utoipa::path(
    get,
    path = "/api/weather",
    tag = "weather",
    params(WeatherParams),
    responses(
        (status = 200, description = "Current conditions", body = WeatherReading),
        (status = 400, description = "Missing city", body = ErrorResponse),
        (status = 502, description = "Weather service failed", body = ErrorResponse),
        (status = 503, description = "Weather service not configured", body = ErrorResponse)
    )
)]
pub async fn current_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Response {
    let city = params.city.trim();
    if city.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Enter a city");
    }

    let Some(weather) = state.weather.as_ref() else {
        return unavailable("Weather service");
    };

    match weather.current(&WeatherQuery::City(city.to_string())).await {
        Ok(reading) => Json(reading).into_response(),
        Err(e) => external_error_response(&e),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(current_weather),
    components(schemas(WeatherReading, WeatherQuery))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, state};
    use std::sync::Arc;
    use tastetrack_core::weather::StaticWeather;
    use tastetrack_core::FakeProvider;

    #[tokio::test]
    async fn test_blank_city_rejected() {
        let (state, _dir) = state(FakeProvider::new());
        let response = current_weather(
            State(state),
            Query(WeatherParams {
                city: "  ".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reading_returned() {
        let (state, _dir) = state(FakeProvider::new());
        let response = current_weather(
            State(state),
            Query(WeatherParams {
                city: "Pune".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let reading: WeatherReading = body_json(response).await;
        assert_eq!(reading.condition, "Clear");
    }

    #[tokio::test]
    async fn test_weather_failure_is_bad_gateway() {
        let (state, _dir) = state(FakeProvider::new());
        let mut ctx = Arc::into_inner(state).unwrap();
        ctx.weather = Some(Arc::new(StaticWeather {
            reading: None,
            place: None,
        }));
        let response = current_weather(
            State(Arc::new(ctx)),
            Query(WeatherParams {
                city: "Atlantis".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
