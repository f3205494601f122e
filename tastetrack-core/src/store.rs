//! Recipe persistence contract.
//!
//! Implemented differently by the server (SQLite) and tests (memory). There is
//! no locking discipline across writers: last write wins per title in a bucket.

use std::sync::RwLock;

use crate::error::StoreError;
use crate::recipe::{FeedbackEvent, MoodBucket, Recipe, RecipeSource};

/// Durable store for canonical recipes and feedback.
pub trait RecipeStore: Send + Sync {
    /// Exact-match lookup. Empty means "must generate", not an error.
    ///
    /// Returned recipes carry [`RecipeSource::Cached`].
    fn lookup(&self, bucket: &MoodBucket) -> Result<Vec<Recipe>, StoreError>;

    /// Insert, or overwrite the recipe with the same title in the same bucket.
    fn upsert(&self, recipe: &Recipe) -> Result<(), StoreError>;

    /// Append a like/dislike. The title is not checked.
    fn record_feedback(&self, event: &FeedbackEvent) -> Result<(), StoreError>;

    /// Delete every recipe. Returns the number removed.
    fn clear(&self) -> Result<usize, StoreError>;

    /// Every stored recipe, for the admin listing.
    fn all(&self) -> Result<Vec<Recipe>, StoreError>;

    /// The whole feedback log, oldest first.
    fn feedback(&self) -> Result<Vec<FeedbackEvent>, StoreError>;
}

/// In-process store, used by tests and for running without a database.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
    feedback: RwLock<Vec<FeedbackEvent>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn lookup(&self, bucket: &MoodBucket) -> Result<Vec<Recipe>, StoreError> {
        let recipes = self.recipes.read().map_err(|_| StoreError::Poisoned)?;
        Ok(recipes
            .iter()
            .filter(|r| r.mood == bucket.mood && r.weather == bucket.weather)
            .map(|r| Recipe {
                source: RecipeSource::Cached,
                ..r.clone()
            })
            .collect())
    }

    fn upsert(&self, recipe: &Recipe) -> Result<(), StoreError> {
        let mut recipes = self.recipes.write().map_err(|_| StoreError::Poisoned)?;
        let existing = recipes.iter_mut().find(|r| {
            r.title == recipe.title && r.mood == recipe.mood && r.weather == recipe.weather
        });
        match existing {
            Some(slot) => *slot = recipe.clone(),
            None => recipes.push(recipe.clone()),
        }
        Ok(())
    }

    fn record_feedback(&self, event: &FeedbackEvent) -> Result<(), StoreError> {
        self.feedback
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .push(event.clone());
        Ok(())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut recipes = self.recipes.write().map_err(|_| StoreError::Poisoned)?;
        let removed = recipes.len();
        recipes.clear();
        Ok(removed)
    }

    fn all(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes.read().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn feedback(&self) -> Result<Vec<FeedbackEvent>, StoreError> {
        Ok(self.feedback.read().map_err(|_| StoreError::Poisoned)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str, mood: &str, weather: &str) -> Recipe {
        Recipe {
            title: title.to_string(),
            ingredients: vec!["rice".to_string()],
            steps: vec!["Cook".to_string()],
            mood: mood.to_string(),
            weather: weather.to_string(),
            source: RecipeSource::Generated,
        }
    }

    #[test]
    fn test_lookup_empty_bucket() {
        let store = MemoryRecipeStore::new();
        let found = store.lookup(&MoodBucket::new("Happy", "Clear")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_upsert_round_trip() {
        let store = MemoryRecipeStore::new();
        let r = recipe("Risotto", "Tired", "Rain");
        store.upsert(&r).unwrap();

        let found = store.lookup(&MoodBucket::new("Tired", "Rain")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Risotto");
        assert_eq!(found[0].ingredients, r.ingredients);
        assert_eq!(found[0].source, RecipeSource::Cached);
    }

    #[test]
    fn test_upsert_overwrites_same_title() {
        let store = MemoryRecipeStore::new();
        store.upsert(&recipe("Risotto", "Tired", "Rain")).unwrap();
        let mut updated = recipe("Risotto", "Tired", "Rain");
        updated.steps = vec!["Stir for 18 minutes".to_string()];
        store.upsert(&updated).unwrap();

        let found = store.lookup(&MoodBucket::new("Tired", "Rain")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].steps, vec!["Stir for 18 minutes"]);
    }

    #[test]
    fn test_same_title_in_other_bucket_is_separate() {
        let store = MemoryRecipeStore::new();
        store.upsert(&recipe("Soup", "Sad", "Rain")).unwrap();
        store.upsert(&recipe("Soup", "Sad", "Snow")).unwrap();
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[test]
    fn test_feedback_and_clear() {
        let store = MemoryRecipeStore::new();
        store.upsert(&recipe("Soup", "Sad", "Rain")).unwrap();
        store
            .record_feedback(&FeedbackEvent {
                recipe_title: "Nonexistent".to_string(),
                liked: false,
            })
            .unwrap();

        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.all().unwrap().is_empty());
        assert_eq!(store.feedback().unwrap().len(), 1);
    }
}
