//! Phone location relay.
//!
//! The phone posts its coordinates; the server resolves place and weather and
//! keeps only the newest report.

use crate::api::{error_response, external_error_response, unavailable, ErrorResponse};
use crate::state::{AppState, LocationReport};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use tastetrack_core::{Place, WeatherQuery};
use utoipa::{OpenApi, ToSchema};

/// Returns the relay router (mounted at the root)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/location", post(report_location))
        .route("/latest", get(latest_report))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LocationRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Accept a location report from the phone
///
/// A reverse-geocoding failure degrades to "Unknown" place fields. A weather
/// failure fails the report and keeps the previous one.
#[utoipa::path(
    post,
    path = "/location",
    tag = "relay",
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Report stored", body = LocationReport),
        (status = 400, description = "Coordinates out of range", body = ErrorResponse),
        (status = 502, description = "Weather service failed", body = ErrorResponse),
        (status = 503, description = "Weather service not configured", body = ErrorResponse)
    )
)]
pub async fn report_location(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Response {
    let LocationRequest { lat, lon } = request;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return error_response(StatusCode::BAD_REQUEST, "Coordinates out of range");
    }

    let Some(weather) = state.weather.as_ref() else {
        return unavailable("Weather service");
    };

    let place = match weather.reverse_geocode(lat, lon).await {
        Ok(place) => place,
        Err(e) => {
            tracing::warn!("Reverse geocoding failed, using unknown place: {}", e);
            Place::unknown()
        }
    };

    let reading = match weather.current(&WeatherQuery::Coordinates { lat, lon }).await {
        Ok(reading) => reading,
        Err(e) => return external_error_response(&e),
    };

    let report = LocationReport {
        lat,
        lon,
        place,
        weather: reading,
        received_at: Utc::now(),
    };
    tracing::info!(city = %report.place.city, condition = %report.weather.condition, "Location report received");
    state.latest.set(report.clone()).await;

    Json(report).into_response()
}

/// The newest location report
#[utoipa::path(
    get,
    path = "/latest",
    tag = "relay",
    responses(
        (status = 200, description = "Latest report", body = LocationReport),
        (status = 404, description = "Nothing reported yet", body = ErrorResponse)
    )
)]
pub async fn latest_report(State(state): State<AppState>) -> Response {
    match state.latest.get().await {
        Some(report) => Json(report).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No location received yet"),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(report_location, latest_report),
    components(schemas(LocationRequest, LocationReport))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, clear_weather, state};
    use std::sync::Arc;
    use tastetrack_core::weather::StaticWeather;
    use tastetrack_core::FakeProvider;

    #[tokio::test]
    async fn test_latest_empty() {
        let (state, _dir) = state(FakeProvider::new());
        let response = latest_report(State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = body_json(response).await;
        assert_eq!(body.error, "No location received yet");
    }

    #[tokio::test]
    async fn test_report_then_latest() {
        let (state, _dir) = state(FakeProvider::new());
        let response = report_location(
            State(state.clone()),
            Json(LocationRequest { lat: 18.52, lon: 73.85 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let latest: LocationReport = body_json(latest_report(State(state)).await).await;
        assert_eq!(latest.place.city, "Pune");
        assert_eq!(latest.weather.condition, "Clear");
        assert_eq!(latest.lat, 18.52);
    }

    #[tokio::test]
    async fn test_geocode_failure_degrades_to_unknown() {
        let (state, _dir) = state(FakeProvider::new());
        let mut ctx = Arc::into_inner(state).unwrap();
        ctx.weather = Some(Arc::new(StaticWeather {
            reading: Some(clear_weather()),
            place: None,
        }));
        let state = Arc::new(ctx);

        let response = report_location(
            State(state.clone()),
            Json(LocationRequest { lat: 0.0, lon: 0.0 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let report: LocationReport = body_json(response).await;
        assert_eq!(report.place, Place::unknown());
    }

    #[tokio::test]
    async fn test_weather_failure_keeps_previous_report() {
        let (state, _dir) = state(FakeProvider::new());
        report_location(
            State(state.clone()),
            Json(LocationRequest { lat: 18.52, lon: 73.85 }),
        )
        .await;

        let mut ctx = Arc::into_inner(state).unwrap();
        ctx.weather = Some(Arc::new(StaticWeather {
            reading: None,
            place: None,
        }));
        let state = Arc::new(ctx);

        let response = report_location(
            State(state.clone()),
            Json(LocationRequest { lat: 1.0, lon: 1.0 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let latest = state.latest.get().await.unwrap();
        assert_eq!(latest.lat, 18.52);
    }

    #[tokio::test]
    async fn test_out_of_range_rejected() {
        let (state, _dir) = state(FakeProvider::new());
        let response = report_location(
            State(state),
            Json(LocationRequest { lat: 91.0, lon: 0.0 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
