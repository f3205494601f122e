use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tastetrack_core::StoreError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Per-connection SQLite settings.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        // Writers from concurrent requests wait instead of failing with SQLITE_BUSY
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str) -> Result<DbPool, StoreError> {
    build_pool(database_url, None)
}

/// Build a pool and run pending migrations on it.
///
/// `max_size` of 1 is required for `:memory:` databases, where each
/// connection would otherwise see its own empty database.
pub fn build_pool(database_url: &str, max_size: Option<u32>) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = r2d2::Pool::builder().connection_customizer(Box::new(SqlitePragmas));
    if let Some(size) = max_size {
        builder = builder.max_size(size);
    }
    let pool = builder
        .build(manager)
        .map_err(|e| StoreError::Pool(e.to_string()))?;

    let mut conn = get_conn(&pool)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Database(format!("migrations failed: {}", e)))?;

    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> Result<DbConn, StoreError> {
    pool.get().map_err(|e| StoreError::Pool(e.to_string()))
}
