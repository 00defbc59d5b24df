use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_DRINK_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drink (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(80) NOT NULL UNIQUE,
        recipe TEXT NOT NULL
    )
"#;

const SEED_TITLE: &str = "water";
const SEED_RECIPE: &str = r#"[{"name":"water","color":"blue","parts":1}]"#;

/// Pool construction and schema lifecycle
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the connection pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?
            .create_if_missing(true);

        // Every connection to `:memory:` opens its own database, so keep exactly one alive
        let max_connections = if config.is_in_memory() { 1 } else { config.max_connections };
        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout));

        if config.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;
        info!("Connected database pool (max {} connections)", max_connections);
        Ok(pool)
    }

    /// Create missing tables without touching existing rows
    pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_DRINK_TABLE).execute(pool).await?;
        Ok(())
    }

    /// Drop every table, recreate them and seed a single drink. Destroys all data.
    pub async fn drop_and_create_all(pool: &SqlitePool) -> Result<(), DatabaseError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS drink").execute(&mut *tx).await?;
        sqlx::query(CREATE_DRINK_TABLE).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind(SEED_TITLE)
            .bind(SEED_RECIPE)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Recreated all tables");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
