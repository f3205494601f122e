//! Response bodies defined by the server rather than the core library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tastetrack_core::{
    FitnessSnapshot, FoodCategory, Place, Rank, Recipe, RecipeSource, SensorContext,
    SensorSnapshot, WeatherReading,
};

#[derive(Debug, Serialize)]
pub struct SuggestRequest<'a> {
    pub mood: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestResponse {
    pub source: RecipeSource,
    pub mood: String,
    pub weather: String,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRequest<'a> {
    pub recipe_title: &'a str,
    pub liked: bool,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackResponse {
    pub recipe_title: String,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct SensorRecipesRequest<'a> {
    pub category: FoodCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness: Option<FitnessSnapshot>,
    pub explore: bool,
}

#[derive(Debug, Deserialize)]
pub struct SensorRecipesResponse {
    pub context: SensorContext,
    pub recipes: Vec<Recipe>,
}

/// Fields left as `None` are filled by the server from the last sensor context.
#[derive(Debug, Serialize)]
pub struct VoteRequest<'a> {
    pub recipe_title: &'a str,
    pub rank: Rank,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<SensorSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_used: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct LocationRequest {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct LocationReport {
    pub lat: f64,
    pub lon: f64,
    pub place: Place,
    pub weather: WeatherReading,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ClearResponse {
    pub removed: usize,
}
