//! Today's activity totals from Google Fit.

use std::env;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExternalCallError, Service};

const DATASETS_URL: &str = "https://www.googleapis.com/fitness/v1/users/me/dataSources";

const STEPS_SOURCE: &str = "derived:com.google.step_count.delta:com.google.android.gms:estimated_steps";
const ACTIVE_MINUTES_SOURCE: &str =
    "derived:com.google.active_minutes:com.google.android.gms:merge_active_minutes";
const CALORIES_SOURCE: &str =
    "derived:com.google.calories.expended:com.google.android.gms:merge_calories_expended";
const HEART_POINTS_SOURCE: &str =
    "derived:com.google.heart_minutes:com.google.android.gms:merge_heart_minutes";

/// Today's activity totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FitnessSnapshot {
    pub steps: u64,
    pub active_minutes: u64,
    pub calories_burned: f64,
    pub heart_points: f64,
}

#[async_trait]
pub trait FitnessCollector: Send + Sync {
    async fn collect(&self) -> Result<FitnessSnapshot, ExternalCallError>;
}

/// Reads the four derived datasets for the local calendar day.
///
/// Takes an OAuth access token; obtaining one is left to the caller.
#[derive(Debug)]
pub struct GoogleFitCollector {
    access_token: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleFitCollector {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            base_url: DATASETS_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from `GOOGLE_FIT_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("GOOGLE_FIT_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("GOOGLE_FIT_ACCESS_TOKEN".to_string()))?;
        Ok(Self::new(token))
    }

    async fn dataset(&self, source: &str, window: &str) -> Result<Dataset, ExternalCallError> {
        let response = self
            .client
            .get(format!("{}/{}/datasets/{}", self.base_url, source, window))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ExternalCallError::from_reqwest(Service::Fitness, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalCallError::from_reqwest(Service::Fitness, e))?;

        if !(200..300).contains(&status) {
            return Err(ExternalCallError::from_status(Service::Fitness, status, body));
        }

        serde_json::from_str(&body).map_err(|e| ExternalCallError::InvalidResponse {
            service: Service::Fitness,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl FitnessCollector for GoogleFitCollector {
    async fn collect(&self) -> Result<FitnessSnapshot, ExternalCallError> {
        let window = dataset_window(&today_bounds(Local::now()));

        let snapshot = FitnessSnapshot {
            steps: self.dataset(STEPS_SOURCE, &window).await?.int_total(),
            active_minutes: self.dataset(ACTIVE_MINUTES_SOURCE, &window).await?.int_total(),
            calories_burned: self.dataset(CALORIES_SOURCE, &window).await?.fp_total(),
            heart_points: self.dataset(HEART_POINTS_SOURCE, &window).await?.fp_total(),
        };

        tracing::info!(
            steps = snapshot.steps,
            active_minutes = snapshot.active_minutes,
            "Fitness totals collected"
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Dataset {
    #[serde(default)]
    point: Vec<DataPoint>,
}

#[derive(Debug, Deserialize)]
struct DataPoint {
    #[serde(default)]
    value: Vec<PointValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointValue {
    int_val: Option<i64>,
    fp_val: Option<f64>,
}

impl Dataset {
    fn int_total(&self) -> u64 {
        let total: i64 = self
            .point
            .iter()
            .filter_map(|p| p.value.first().and_then(|v| v.int_val))
            .sum();
        total.max(0) as u64
    }

    fn fp_total(&self) -> f64 {
        self.point
            .iter()
            .filter_map(|p| p.value.first().and_then(|v| v.fp_val))
            .sum()
    }
}

/// Start and end of the calendar day containing `now`.
fn today_bounds<Tz: TimeZone>(now: DateTime<Tz>) -> (i64, i64) {
    let date = now.date_naive();
    let tz = now.timezone();
    let start = tz
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|d| d.timestamp())
        .unwrap_or_else(|| now.timestamp());
    // Last second of the day, matching an inclusive end bound
    let end = start + 24 * 60 * 60 - 1;
    (start, end)
}

/// Dataset id in nanoseconds, "start-end".
fn dataset_window(bounds: &(i64, i64)) -> String {
    let nanos = 1_000_000_000i128;
    format!("{}-{}", bounds.0 as i128 * nanos, bounds.1 as i128 * nanos)
}

/// Fixed totals, for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticFitness(pub Option<FitnessSnapshot>);

#[async_trait]
impl FitnessCollector for StaticFitness {
    async fn collect(&self) -> Result<FitnessSnapshot, ExternalCallError> {
        self.0.clone().ok_or_else(|| ExternalCallError::Unauthorized {
            service: Service::Fitness,
            message: "no access token".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_dataset_totals() {
        let body = r#"{
            "dataSourceId": "x",
            "point": [
                {"startTimeNanos": "1", "value": [{"intVal": 1200, "mapVal": []}]},
                {"startTimeNanos": "2", "value": [{"intVal": 800}]},
                {"startTimeNanos": "3", "value": [{"fpVal": 2.5}]},
                {"startTimeNanos": "4", "value": []}
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(body).unwrap();
        assert_eq!(dataset.int_total(), 2000);
        assert_eq!(dataset.fp_total(), 2.5);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert_eq!(dataset.int_total(), 0);
        assert_eq!(dataset.fp_total(), 0.0);
    }

    #[test]
    fn test_today_window() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 15, 45, 10).unwrap();
        let (start, end) = today_bounds(now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap().timestamp());
        assert_eq!(end - start, 86_399);
        assert_eq!(
            dataset_window(&(1, 2)),
            "1000000000-2000000000".to_string()
        );
    }

    #[tokio::test]
    async fn test_static_fitness_unauthorized() {
        let err = StaticFitness(None).collect().await.unwrap_err();
        assert!(matches!(err, ExternalCallError::Unauthorized { .. }));
    }
}
