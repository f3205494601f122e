//! Sensor-mode suggestions from activity, weather and location.
//!
//! Sensor recipes are per-session: they are never written to the recipe store.

use std::fmt;

use chrono::{Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::SuggestError;
use crate::fitness::FitnessSnapshot;
use crate::ledger::SensorSnapshot;
use crate::llm::LlmProvider;
use crate::recipe::{MoodBucket, Recipe};
use crate::suggest::{generate_from_prompt, GenerateOptions};
use crate::weather::{Place, WeatherReading};

/// Cuisine used when neither an override nor a country is known.
pub const LOCAL_CUISINE: &str = "Local";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum MealTime {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl MealTime {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            h if h < 12 => MealTime::Morning,
            h if h < 16 => MealTime::Afternoon,
            h if h < 20 => MealTime::Evening,
            _ => MealTime::Night,
        }
    }

    pub fn now() -> Self {
        Self::from_hour(Local::now().hour())
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum FoodCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
    Dessert,
    Beverage,
    Soup,
    #[serde(rename = "High Protein")]
    HighProtein,
    #[serde(rename = "Comfort Food")]
    ComfortFood,
    Hydration,
    #[serde(rename = "Weight Loss Friendly")]
    WeightLossFriendly,
}

impl FoodCategory {
    pub const ALL: &'static [FoodCategory] = &[
        FoodCategory::Breakfast,
        FoodCategory::Lunch,
        FoodCategory::Dinner,
        FoodCategory::Snacks,
        FoodCategory::Dessert,
        FoodCategory::Beverage,
        FoodCategory::Soup,
        FoodCategory::HighProtein,
        FoodCategory::ComfortFood,
        FoodCategory::Hydration,
        FoodCategory::WeightLossFriendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Breakfast => "Breakfast",
            FoodCategory::Lunch => "Lunch",
            FoodCategory::Dinner => "Dinner",
            FoodCategory::Snacks => "Snacks",
            FoodCategory::Dessert => "Dessert",
            FoodCategory::Beverage => "Beverage",
            FoodCategory::Soup => "Soup",
            FoodCategory::HighProtein => "High Protein",
            FoodCategory::ComfortFood => "Comfort Food",
            FoodCategory::Hydration => "Hydration",
            FoodCategory::WeightLossFriendly => "Weight Loss Friendly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

/// Override if given, else the detected country, else [`LOCAL_CUISINE`].
pub fn choose_cuisine(cuisine_override: Option<&str>, country: &str) -> String {
    let pick = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    cuisine_override
        .and_then(pick)
        .or_else(|| pick(country))
        .unwrap_or_else(|| LOCAL_CUISINE.to_string())
}

/// Everything the sensor prompts are built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SensorContext {
    pub place: Place,
    pub weather: WeatherReading,
    pub fitness: FitnessSnapshot,
    pub meal_time: MealTime,
    pub category: FoodCategory,
    pub cuisine: String,
}

impl SensorContext {
    /// The vote-time snapshot of this context.
    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            steps: self.fitness.steps,
            active_minutes: self.fitness.active_minutes,
            calories: self.fitness.calories_burned,
            heart_points: self.fitness.heart_points,
            temperature: self.weather.temperature_celsius,
            condition: self.weather.condition.clone(),
        }
    }

    fn bucket(&self) -> MoodBucket {
        MoodBucket::new(self.category.as_str(), self.weather.condition.clone())
    }
}

pub fn top_three_prompt(ctx: &SensorContext) -> String {
    format!(
        r#"
You are a GLOBAL smart food recommender.
User context:
- City: {city}
- State: {state}
- Country: {country}
- Cuisine override: {cuisine}
- Meal time: {meal_time}
- Category: {category}
- Weather: {condition}
- Temp (C): {temp}
- Activity: steps={steps}, active_min={active}, calories={calories}, heart={heart}

Rules:
1) Use cuisine_override if provided (exact cuisine). Otherwise choose dishes typical for the detected country.
2) Match meal time (breakfast/snack/main/night).
3) Match category (e.g. Dessert, High Protein).
4) Consider weather and activity (hot -> cooling; cold -> warm; high activity -> protein).
5) Return EXACT JSON array of 3 objects:
[
  {{
    "title": "Recipe Name",
    "ingredients": ["item1","item2"],
    "steps": ["step1","step2"]
  }},
  ...
]
Do NOT output anything outside the JSON.
"#,
        city = ctx.place.city,
        state = ctx.place.state,
        country = ctx.place.country,
        cuisine = ctx.cuisine,
        meal_time = ctx.meal_time,
        category = ctx.category.as_str(),
        condition = ctx.weather.condition,
        temp = ctx.weather.temperature_celsius,
        steps = ctx.fitness.steps,
        active = ctx.fitness.active_minutes,
        calories = ctx.fitness.calories_burned,
        heart = ctx.fitness.heart_points,
    )
}

pub fn explore_prompt(ctx: &SensorContext) -> String {
    format!(
        "Suggest 3 different recipes for cuisine={}, meal_time={}, category={}, weather={}, steps={}. Return JSON array.",
        ctx.cuisine,
        ctx.meal_time,
        ctx.category.as_str(),
        ctx.weather.condition,
        ctx.fitness.steps,
    )
}

/// Generate the ranked top three for this context.
pub async fn generate_top_three(
    provider: &dyn LlmProvider,
    ctx: &SensorContext,
    options: GenerateOptions,
) -> Result<Vec<Recipe>, SuggestError> {
    tracing::info!(cuisine = %ctx.cuisine, category = ctx.category.as_str(), "Generating sensor recipes");
    generate_from_prompt(provider, &top_three_prompt(ctx), &ctx.bucket(), options).await
}

/// Generate a different set of three for the same context.
pub async fn explore_more(
    provider: &dyn LlmProvider,
    ctx: &SensorContext,
    options: GenerateOptions,
) -> Result<Vec<Recipe>, SuggestError> {
    tracing::info!(cuisine = %ctx.cuisine, "Exploring more sensor recipes");
    generate_from_prompt(provider, &explore_prompt(ctx), &ctx.bucket(), options).await
}
