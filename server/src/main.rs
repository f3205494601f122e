mod api;
mod config;
mod db;
mod models;
mod schema;
mod state;
mod store;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::Router;
use tastetrack_core::weather::WeatherConfig;
use tastetrack_core::{
    create_provider_from_env, CsvVoteLedger, FitnessCollector, GenerateOptions,
    GoogleFitCollector, OpenWeatherClient, WeatherLookup,
};
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ServerConfig;
use crate::state::{AppContext, AppState, LatestContext, LatestReport};
use crate::store::DbRecipeStore;

/// Console logging, filtered by `RUST_LOG` (default "info").
fn init_telemetry() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn weather_from_env() -> Option<Arc<dyn WeatherLookup>> {
    let client = WeatherConfig::from_env()
        .map_err(|e| e.to_string())
        .and_then(|config| OpenWeatherClient::new(config).map_err(|e| e.to_string()));
    match client {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!("Weather lookups disabled: {}", e);
            None
        }
    }
}

fn fitness_from_env() -> Option<Arc<dyn FitnessCollector>> {
    match GoogleFitCollector::from_env() {
        Ok(collector) => Some(Arc::new(collector)),
        Err(e) => {
            tracing::warn!("Fitness collection disabled: {}", e);
            None
        }
    }
}

fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let provider = create_provider_from_env().context("Failed to configure language model")?;
    tracing::info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        "Language model configured"
    );

    let pool = db::create_pool(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let ledger = CsvVoteLedger::open(&config.votes_path)
        .with_context(|| format!("Failed to open vote ledger {}", config.votes_path.display()))?;

    if config.admin_secret.is_none() {
        tracing::info!("TASTETRACK_ADMIN_SECRET not set, admin endpoints disabled");
    }

    Ok(Arc::new(AppContext {
        provider: Arc::from(provider),
        store: Arc::new(DbRecipeStore::new(pool)),
        ledger: Arc::new(ledger),
        weather: weather_from_env(),
        fitness: fitness_from_env(),
        latest: LatestReport::default(),
        last_context: LatestContext::default(),
        admin_secret: config.admin_secret.clone(),
        options: GenerateOptions::default(),
    }))
}

fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/weather", api::weather::router())
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/sensor", api::sensor::router())
        .nest("/api/analytics", api::analytics::router())
        .nest("/api/admin", api::admin::router())
        .merge(api::relay::router())
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    init_telemetry();

    let config = ServerConfig::from_env();
    let state = build_state(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
