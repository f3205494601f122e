use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tastetrack_core::{
    FitnessCollector, GenerateOptions, LlmProvider, Place, RecipeStore, SensorContext,
    VoteLedger, WeatherLookup, WeatherReading,
};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// The most recent phone report: where it was and the weather there.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationReport {
    pub lat: f64,
    pub lon: f64,
    pub place: Place,
    pub weather: WeatherReading,
    pub received_at: DateTime<Utc>,
}

/// Single process-wide slot; each write replaces the previous value.
#[derive(Debug)]
pub struct Latest<T> {
    slot: RwLock<Option<T>>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<T: Clone> Latest<T> {
    pub async fn get(&self) -> Option<T> {
        self.slot.read().await.clone()
    }

    pub async fn set(&self, value: T) {
        *self.slot.write().await = Some(value);
    }
}

pub type LatestReport = Latest<LocationReport>;

/// The context the last sensor top three was built from. Votes reuse it.
pub type LatestContext = Latest<SensorContext>;

/// Collaborators shared by all handlers.
///
/// Weather and fitness are optional; endpoints needing a missing one answer 503.
pub struct AppContext {
    pub provider: Arc<dyn LlmProvider>,
    pub store: Arc<dyn RecipeStore>,
    pub ledger: Arc<dyn VoteLedger>,
    pub weather: Option<Arc<dyn WeatherLookup>>,
    pub fitness: Option<Arc<dyn FitnessCollector>>,
    pub latest: LatestReport,
    pub last_context: LatestContext,
    pub admin_secret: Option<String>,
    pub options: GenerateOptions,
}

/// Application state shared across all handlers
pub type AppState = Arc<AppContext>;
