use chrono::NaiveDateTime;
use diesel::prelude::*;
use tastetrack_core::{FeedbackEvent, Recipe, RecipeSource, StoreError};

/// A stored recipe. List columns hold JSON arrays of strings.
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeRow {
    pub title: String,
    pub mood: String,
    pub weather: String,
    pub ingredients: String,
    pub steps: String,
    #[allow(dead_code)]
    pub source: String,
    #[allow(dead_code)]
    pub updated_at: NaiveDateTime,
}

impl RecipeRow {
    /// Everything read back from the table is served as cached.
    pub fn into_recipe(self) -> Result<Recipe, StoreError> {
        Ok(Recipe {
            ingredients: serde_json::from_str(&self.ingredients)?,
            steps: serde_json::from_str(&self.steps)?,
            title: self.title,
            mood: self.mood,
            weather: self.weather,
            source: RecipeSource::Cached,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub mood: &'a str,
    pub weather: &'a str,
    pub ingredients: String,
    pub steps: String,
    pub source: &'a str,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewRecipe<'a> {
    pub fn from_recipe(recipe: &'a Recipe, now: NaiveDateTime) -> Result<Self, StoreError> {
        Ok(Self {
            title: &recipe.title,
            mood: &recipe.mood,
            weather: &recipe.weather,
            ingredients: serde_json::to_string(&recipe.ingredients)?,
            steps: serde_json::to_string(&recipe.steps)?,
            source: recipe.source.as_str(),
            updated_at: now,
        })
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FeedbackRow {
    #[allow(dead_code)]
    pub id: i32,
    pub recipe_title: String,
    pub liked: bool,
    #[allow(dead_code)]
    pub created_at: NaiveDateTime,
}

impl From<FeedbackRow> for FeedbackEvent {
    fn from(row: FeedbackRow) -> Self {
        FeedbackEvent {
            recipe_title: row.recipe_title,
            liked: row.liked,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::feedback)]
pub struct NewFeedback<'a> {
    pub recipe_title: &'a str,
    pub liked: bool,
    pub created_at: NaiveDateTime,
}
