//! Current weather and reverse geocoding via OpenWeatherMap.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExternalCallError, Service};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Weather calls give up after this long.
pub const WEATHER_TIMEOUT: Duration = Duration::from_secs(8);

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WeatherReading {
    /// Coarse condition, e.g. "Clear", "Rain". Used as the bucket key.
    pub condition: String,
    pub description: String,
    pub temperature_celsius: f64,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Place {
    pub city: String,
    pub state: String,
    pub country: String,
}

impl Place {
    pub fn unknown() -> Self {
        Self {
            city: UNKNOWN.to_string(),
            state: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
        }
    }
}

/// Weather collaborator.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, ExternalCallError>;

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, ExternalCallError>;
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

impl WeatherConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `OPENWEATHER_API_KEY`.
    /// Optional: `TASTETRACK_WEATHER_BASE_URL` (default: "https://api.openweathermap.org").
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENWEATHER_API_KEY".to_string()))?;
        let base_url = env::var("TASTETRACK_WEATHER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self { api_key, base_url })
    }
}

#[derive(Debug)]
pub struct OpenWeatherClient {
    config: WeatherConfig,
    client: reqwest::Client,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self, ExternalCallError> {
        let client = reqwest::Client::builder()
            .timeout(WEATHER_TIMEOUT)
            .build()
            .map_err(|e| ExternalCallError::from_reqwest(Service::Weather, e))?;
        Ok(Self { config, client })
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ExternalCallError> {
        let response = self
            .client
            .get(format!("{}{}", self.config.base_url.trim_end_matches('/'), path))
            .query(query)
            .query(&[("appid", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ExternalCallError::from_reqwest(Service::Weather, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalCallError::from_reqwest(Service::Weather, e))?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ApiMessage>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            return Err(ExternalCallError::from_status(Service::Weather, status, message));
        }
        Ok(body)
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, ExternalCallError> {
        let mut params = vec![("units", "metric".to_string())];
        match query {
            WeatherQuery::City(name) => params.push(("q", name.clone())),
            WeatherQuery::Coordinates { lat, lon } => {
                params.push(("lat", lat.to_string()));
                params.push(("lon", lon.to_string()));
            }
        }

        let body = self.get_text("/data/2.5/weather", &params).await?;
        let reading = parse_current(&body)?;
        tracing::debug!(condition = %reading.condition, temp = reading.temperature_celsius, "Weather fetched");
        Ok(reading)
    }

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, ExternalCallError> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("limit", "1".to_string()),
        ];
        let body = self.get_text("/geo/1.0/reverse", &params).await?;
        parse_geocode(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    weather: Vec<CurrentCondition>,
    main: CurrentMain,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    main: String,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    name: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

fn invalid(message: impl Into<String>) -> ExternalCallError {
    ExternalCallError::InvalidResponse {
        service: Service::Weather,
        message: message.into(),
    }
}

/// Parse an OpenWeatherMap current-weather body.
pub fn parse_current(body: &str) -> Result<WeatherReading, ExternalCallError> {
    let response: CurrentResponse = serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
    let condition = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| invalid("response has no weather conditions"))?;

    Ok(WeatherReading {
        condition: condition.main,
        description: condition.description,
        temperature_celsius: response.main.temp,
        icon: condition.icon,
    })
}

/// Parse a reverse-geocode body; an empty result means an unknown place.
pub fn parse_geocode(body: &str) -> Result<Place, ExternalCallError> {
    let entries: Vec<GeocodeEntry> = serde_json::from_str(body).map_err(|e| invalid(e.to_string()))?;
    let Some(entry) = entries.into_iter().next() else {
        return Ok(Place::unknown());
    };

    let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_string());
    Ok(Place {
        city: or_unknown(entry.name),
        state: or_unknown(entry.state),
        country: or_unknown(entry.country),
    })
}

/// Fixed weather, for tests and offline runs.
#[derive(Debug, Clone)]
pub struct StaticWeather {
    pub reading: Option<WeatherReading>,
    pub place: Option<Place>,
}

#[async_trait]
impl WeatherLookup for StaticWeather {
    async fn current(&self, _query: &WeatherQuery) -> Result<WeatherReading, ExternalCallError> {
        self.reading.clone().ok_or_else(|| ExternalCallError::Request {
            service: Service::Weather,
            message: "no reading configured".to_string(),
        })
    }

    async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Place, ExternalCallError> {
        self.place.clone().ok_or_else(|| ExternalCallError::Request {
            service: Service::Weather,
            message: "no place configured".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current() {
        let body = r#"{
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 31.2, "humidity": 40},
            "name": "Pune"
        }"#;
        let reading = parse_current(body).unwrap();
        assert_eq!(reading.condition, "Clear");
        assert_eq!(reading.description, "clear sky");
        assert_eq!(reading.temperature_celsius, 31.2);
        assert_eq!(reading.icon.as_deref(), Some("01d"));
    }

    #[test]
    fn test_parse_current_without_conditions() {
        let body = r#"{"weather": [], "main": {"temp": 3.0}}"#;
        assert!(matches!(
            parse_current(body),
            Err(ExternalCallError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_parse_geocode() {
        let body = r#"[{"name": "Pune", "state": "Maharashtra", "country": "IN", "lat": 18.5}]"#;
        let place = parse_geocode(body).unwrap();
        assert_eq!(place.city, "Pune");
        assert_eq!(place.state, "Maharashtra");
        assert_eq!(place.country, "IN");
    }

    #[test]
    fn test_parse_geocode_missing_fields_and_empty() {
        let place = parse_geocode(r#"[{"name": "Atlantis"}]"#).unwrap();
        assert_eq!(place.state, "Unknown");

        assert_eq!(parse_geocode("[]").unwrap(), Place::unknown());
    }

    #[test]
    fn test_query_serialization() {
        let q: WeatherQuery = serde_json::from_str(r#"{"coordinates": {"lat": 1.5, "lon": 2.0}}"#).unwrap();
        assert_eq!(q, WeatherQuery::Coordinates { lat: 1.5, lon: 2.0 });
    }
}
