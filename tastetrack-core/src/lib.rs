pub mod analytics;
pub mod enrich;
pub mod error;
pub mod fitness;
pub mod ledger;
pub mod llm;
pub mod normalize;
pub mod parse;
pub mod recipe;
pub mod sensor;
pub mod store;
pub mod suggest;
pub mod weather;

pub use analytics::{AccuracySummary, CuisineCount, FeedbackSummary};
pub use error::{
    ConfigError, EnrichmentFailure, ExternalCallError, FormatError, LedgerError, Service,
    StoreError, SuggestError,
};
pub use fitness::{FitnessCollector, FitnessSnapshot, GoogleFitCollector};
pub use ledger::{CsvVoteLedger, Rank, SensorSnapshot, VoteLedger, VoteRecord};
pub use llm::{create_provider_from_env, FakeProvider, GroqProvider, LlmProvider};
pub use normalize::{clean_step_text, normalize_ingredient, normalize_step, RawEntry};
pub use parse::{extract_json, ExpectedShape};
pub use recipe::{FeedbackEvent, MoodBucket, Recipe, RecipeSource};
pub use sensor::{FoodCategory, MealTime, SensorContext};
pub use store::{MemoryRecipeStore, RecipeStore};
pub use suggest::{suggest_for_mood, GenerateOptions, Suggestions};
pub use weather::{OpenWeatherClient, Place, WeatherLookup, WeatherQuery, WeatherReading};
