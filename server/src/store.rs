//! SQLite-backed [`RecipeStore`].

use chrono::Utc;
use diesel::prelude::*;
use tastetrack_core::{FeedbackEvent, MoodBucket, Recipe, RecipeStore, StoreError};

use crate::db::{get_conn, DbPool};
use crate::models::{FeedbackRow, NewFeedback, NewRecipe, RecipeRow};
use crate::schema::{feedback, recipes};

fn db_error(e: diesel::result::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[derive(Clone)]
pub struct DbRecipeStore {
    pool: DbPool,
}

impl DbRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RecipeStore for DbRecipeStore {
    fn lookup(&self, bucket: &MoodBucket) -> Result<Vec<Recipe>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::mood.eq(&bucket.mood))
            .filter(recipes::weather.eq(&bucket.weather))
            .order(recipes::title.asc())
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .map_err(db_error)?;

        rows.into_iter().map(RecipeRow::into_recipe).collect()
    }

    fn upsert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let row = NewRecipe::from_recipe(recipe, Utc::now().naive_utc())?;
        let mut conn = get_conn(&self.pool)?;
        // Primary key is (title, mood, weather), so this overwrites in place
        diesel::replace_into(recipes::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(db_error)?;
        Ok(())
    }

    fn record_feedback(&self, event: &FeedbackEvent) -> Result<(), StoreError> {
        let mut conn = get_conn(&self.pool)?;
        diesel::insert_into(feedback::table)
            .values(NewFeedback {
                recipe_title: &event.recipe_title,
                liked: event.liked,
                created_at: Utc::now().naive_utc(),
            })
            .execute(&mut conn)
            .map_err(db_error)?;
        Ok(())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        diesel::delete(recipes::table)
            .execute(&mut conn)
            .map_err(db_error)
    }

    fn all(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        let rows: Vec<RecipeRow> = recipes::table
            .order((recipes::mood.asc(), recipes::weather.asc(), recipes::title.asc()))
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .map_err(db_error)?;

        rows.into_iter().map(RecipeRow::into_recipe).collect()
    }

    fn feedback(&self) -> Result<Vec<FeedbackEvent>, StoreError> {
        let mut conn = get_conn(&self.pool)?;
        let rows: Vec<FeedbackRow> = feedback::table
            .order(feedback::id.asc())
            .select(FeedbackRow::as_select())
            .load(&mut conn)
            .map_err(db_error)?;

        Ok(rows.into_iter().map(FeedbackEvent::from).collect())
    }
}
