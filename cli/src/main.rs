mod client;
mod render;
mod types;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tastetrack_core::{
    AccuracySummary, FeedbackSummary, FitnessSnapshot, FoodCategory, Rank, Recipe,
    SensorSnapshot, VoteRecord, WeatherReading,
};

use crate::client::ApiClient;
use crate::types::{
    ClearResponse, FeedbackRequest, FeedbackResponse, LocationReport, LocationRequest,
    SensorRecipesRequest, SensorRecipesResponse, SuggestRequest, SuggestResponse, VoteRequest,
};

#[derive(Parser)]
#[command(name = "tastetrack")]
#[command(about = "Recipe suggestions from mood, weather and activity", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, global = true, env = "TASTETRACK_SERVER", default_value = "http://localhost:5050")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current weather for a city
    Weather {
        city: String,
    },
    /// Suggest recipes for a mood
    Suggest {
        mood: String,
        /// Look the weather up for this city
        #[arg(long)]
        city: Option<String>,
        /// Use this weather condition directly (e.g. Clear, Rain)
        #[arg(long, conflicts_with = "city")]
        weather: Option<String>,
    },
    /// Like a recipe
    Like {
        title: String,
    },
    /// Dislike a recipe
    Dislike {
        title: String,
    },
    /// Top three recipes for today's activity and the phone's weather
    Sensor {
        /// Food category, e.g. "Dinner", "High Protein"
        #[arg(long, value_parser = parse_category)]
        category: FoodCategory,
        /// Exact cuisine instead of the detected country
        #[arg(long)]
        cuisine: Option<String>,
        /// Ask for a different set of three
        #[arg(long)]
        explore: bool,
        #[command(flatten)]
        fitness: FitnessArgs,
    },
    /// Record which sensor recipe was best
    ///
    /// Activity, weather, place and cuisine default to the context of the last
    /// `sensor` call.
    Vote {
        title: String,
        /// Position the recipe had in the list (1-3)
        #[arg(long, value_parser = parse_rank)]
        rank: Rank,
        #[arg(long)]
        cuisine: Option<String>,
        #[command(flatten)]
        fitness: FitnessArgs,
    },
    /// Send a location report, as the phone would
    ReportLocation {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Show the latest location report
    Latest,
    /// How often the first sensor pick won the vote
    Accuracy,
    /// Like/dislike totals
    FeedbackStats,
    /// Inspect or clear the recipe store
    Admin {
        /// Shared admin secret
        #[arg(long, env = "TASTETRACK_ADMIN_SECRET", hide_env_values = true)]
        admin_secret: Option<String>,
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List every stored recipe
    List,
    /// Delete every stored recipe
    Clear,
}

/// Today's activity, when entered by hand instead of collected by the server.
#[derive(clap::Args)]
struct FitnessArgs {
    #[arg(long)]
    steps: Option<u64>,
    #[arg(long, default_value_t = 0)]
    active_minutes: u64,
    #[arg(long, default_value_t = 0.0)]
    calories: f64,
    #[arg(long, default_value_t = 0.0)]
    heart_points: f64,
}

impl FitnessArgs {
    fn snapshot(&self) -> Option<FitnessSnapshot> {
        self.steps.map(|steps| FitnessSnapshot {
            steps,
            active_minutes: self.active_minutes,
            calories_burned: self.calories,
            heart_points: self.heart_points,
        })
    }
}

fn parse_category(s: &str) -> Result<FoodCategory, String> {
    FoodCategory::parse(s).ok_or_else(|| {
        let names: Vec<&str> = FoodCategory::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}', expected one of: {}", s, names.join(", "))
    })
}

fn parse_rank(s: &str) -> Result<Rank, String> {
    let value: u8 = s.parse().map_err(|_| format!("invalid rank '{}'", s))?;
    Rank::try_from(value)
}

fn print_recipes(recipes: &[Recipe]) {
    for (i, recipe) in recipes.iter().enumerate() {
        println!("{}", render::recipe(i + 1, recipe));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let admin_secret = match &cli.command {
        Commands::Admin { admin_secret, .. } => admin_secret.clone(),
        _ => None,
    };
    let client = ApiClient::new(&cli.server, admin_secret);

    match cli.command {
        Commands::Weather { city } => {
            let reading: WeatherReading = client.get("/api/weather", &[("city", city.as_str())]).await?;
            println!("{}: {}", city, render::weather(&reading));
        }
        Commands::Suggest { mood, city, weather } => {
            let response: SuggestResponse = client
                .post(
                    "/api/recipes/suggest",
                    &SuggestRequest {
                        mood: &mood,
                        weather: weather.as_deref(),
                        city: city.as_deref(),
                    },
                )
                .await?;
            println!(
                "{} recipes for mood '{}' and weather '{}' ({})\n",
                response.recipes.len(),
                response.mood,
                response.weather,
                response.source.as_str()
            );
            print_recipes(&response.recipes);
        }
        Commands::Like { title } => feedback(&client, &title, true).await?,
        Commands::Dislike { title } => feedback(&client, &title, false).await?,
        Commands::Sensor {
            category,
            cuisine,
            explore,
            fitness,
        } => {
            let response: SensorRecipesResponse = client
                .post(
                    "/api/sensor/recipes",
                    &SensorRecipesRequest {
                        category,
                        cuisine: cuisine.as_deref(),
                        fitness: fitness.snapshot(),
                        explore,
                    },
                )
                .await?;
            let ctx = &response.context;
            println!(
                "{} / {} / {} cuisine in {}, {}\n",
                ctx.category.as_str(),
                ctx.meal_time,
                ctx.cuisine,
                ctx.place.city,
                render::weather(&ctx.weather)
            );
            print_recipes(&response.recipes);
        }
        Commands::Vote {
            title,
            rank,
            cuisine,
            fitness,
        } => {
            // Hand-entered activity is paired with the phone's current weather
            let manual = match fitness.snapshot() {
                Some(activity) => {
                    let report: LocationReport = client.get("/latest", &[]).await?;
                    let sensor = SensorSnapshot {
                        steps: activity.steps,
                        active_minutes: activity.active_minutes,
                        calories: activity.calories_burned,
                        heart_points: activity.heart_points,
                        temperature: report.weather.temperature_celsius,
                        condition: report.weather.condition.clone(),
                    };
                    Some((sensor, report.place))
                }
                None => None,
            };
            let request = VoteRequest {
                recipe_title: &title,
                rank,
                sensor: manual.as_ref().map(|(sensor, _)| sensor.clone()),
                cuisine_used: cuisine.as_deref(),
                country: manual.as_ref().map(|(_, place)| place.country.as_str()),
                city: manual.as_ref().map(|(_, place)| place.city.as_str()),
            };
            let record: VoteRecord = client.post("/api/sensor/votes", &request).await?;
            println!(
                "Recorded rank {} for '{}' at {}",
                record.rank.get(),
                record.recipe_title,
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        Commands::ReportLocation { lat, lon } => {
            let report: LocationReport = client.post("/location", &LocationRequest { lat, lon }).await?;
            println!("{}", render::report(&report));
        }
        Commands::Latest => {
            let report: LocationReport = client.get("/latest", &[]).await?;
            println!("{}", render::report(&report));
        }
        Commands::Accuracy => {
            let summary: AccuracySummary = client.get("/api/analytics/accuracy", &[]).await?;
            print!("{}", render::accuracy(&summary));
        }
        Commands::FeedbackStats => {
            let summary: FeedbackSummary = client.get("/api/analytics/feedback", &[]).await?;
            println!("{}", render::feedback(&summary));
        }
        Commands::Admin { action, .. } => match action {
            AdminAction::List => {
                let recipes: Vec<Recipe> = client.admin_get("/api/admin/recipes").await?;
                println!("{} stored recipes", recipes.len());
                for recipe in &recipes {
                    println!("  [{} / {}] {}", recipe.mood, recipe.weather, recipe.title);
                }
            }
            AdminAction::Clear => {
                let response: ClearResponse = client.admin_post("/api/admin/clear").await?;
                println!("Removed {} recipes", response.removed);
            }
        },
    }

    Ok(())
}

async fn feedback(client: &ApiClient, title: &str, liked: bool) -> Result<()> {
    let response: FeedbackResponse = client
        .post(
            "/api/recipes/feedback",
            &FeedbackRequest {
                recipe_title: title,
                liked,
            },
        )
        .await?;
    let verdict = if response.liked { "Liked" } else { "Disliked" };
    println!("{} '{}'", verdict, response.recipe_title);
    Ok(())
}
