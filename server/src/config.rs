use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "tastetrack.db";
pub const DEFAULT_VOTES_PATH: &str = "accuracy_results.csv";
pub const DEFAULT_BIND: &str = "0.0.0.0:5050";

/// Process-level settings. Collaborator credentials are read by their own
/// `from_env` constructors.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub votes_path: PathBuf,
    /// Admin endpoints answer 403 while this is unset.
    pub admin_secret: Option<String>,
    pub bind: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `DATABASE_URL`: SQLite path (default: "tastetrack.db")
    /// - `TASTETRACK_VOTES_PATH`: vote ledger CSV (default: "accuracy_results.csv")
    /// - `TASTETRACK_ADMIN_SECRET`: shared secret for admin endpoints
    /// - `TASTETRACK_BIND`: listen address (default: "0.0.0.0:5050")
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            votes_path: env::var("TASTETRACK_VOTES_PATH")
                .unwrap_or_else(|_| DEFAULT_VOTES_PATH.to_string())
                .into(),
            admin_secret: env::var("TASTETRACK_ADMIN_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            bind: env::var("TASTETRACK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
        }
    }
}
