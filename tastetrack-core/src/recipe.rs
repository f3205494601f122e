//! Recipe data model and decoding of raw model suggestions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormatError;
use crate::normalize::{canonical_step, normalize_ingredient, RawEntry};

/// Where a recipe handed to the caller came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Cached,
    Generated,
}

impl RecipeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeSource::Cached => "cached",
            RecipeSource::Generated => "generated",
        }
    }
}

/// The (mood, weather condition) pair persisted recipes are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MoodBucket {
    pub mood: String,
    pub weather: String,
}

impl MoodBucket {
    pub fn new(mood: impl Into<String>, weather: impl Into<String>) -> Self {
        Self {
            mood: mood.into(),
            weather: weather.into(),
        }
    }
}

/// A canonical recipe: ingredients and steps are already flat strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub mood: String,
    pub weather: String,
    pub source: RecipeSource,
}

impl Recipe {
    pub fn bucket(&self) -> MoodBucket {
        MoodBucket::new(self.mood.clone(), self.weather.clone())
    }
}

/// A like/dislike on a recipe title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeedbackEvent {
    pub recipe_title: String,
    pub liked: bool,
}

/// One recipe as the model described it, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecipe {
    pub title: String,
    pub ingredients: Vec<RawEntry>,
    pub steps: Vec<RawEntry>,
}

impl RawRecipe {
    /// Decode one element of the model's array. Returns None without a usable title.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let title = object.get("title")?.as_str()?.trim();
        if title.is_empty() {
            return None;
        }

        Some(Self {
            title: title.to_string(),
            ingredients: entries(object.get("ingredients")),
            steps: entries(object.get("steps")),
        })
    }

    /// Flatten into a canonical recipe filed under `bucket`.
    pub fn canonicalize(&self, bucket: &MoodBucket, source: RecipeSource) -> Recipe {
        Recipe {
            title: self.title.clone(),
            ingredients: self.ingredients.iter().map(normalize_ingredient).collect(),
            steps: self.steps.iter().map(canonical_step).collect(),
            mood: bucket.mood.clone(),
            weather: bucket.weather.clone(),
            source,
        }
    }
}

/// Decode the model's recipe array, skipping elements without a title.
pub fn decode_recipes(value: &Value) -> Result<Vec<RawRecipe>, FormatError> {
    let items = value.as_array().ok_or(FormatError::NoRecipes)?;

    let recipes: Vec<RawRecipe> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let recipe = RawRecipe::from_value(item);
            if recipe.is_none() {
                tracing::warn!(index, "Skipping suggested recipe without a title");
            }
            recipe
        })
        .collect();

    if recipes.is_empty() {
        return Err(FormatError::NoRecipes);
    }
    Ok(recipes)
}

/// A list field may arrive as an array, a single entry, or not at all.
fn entries(value: Option<&Value>) -> Vec<RawEntry> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().cloned().map(RawEntry::from).collect(),
        Some(single) => vec![RawEntry::from(single.clone())],
    }
}
