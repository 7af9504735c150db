use crate::models::{Investor, Startup};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when reading from PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Read-only access to the startup and investor tables.
///
/// The schema and its row-level-security policies are owned by the hosted
/// database; this client only ever selects.
pub struct PostgresClient {
    pool: PgPool,
}

const STARTUP_COLUMNS: &str = "id, name, sectors, total_god_score::float8 AS total_god_score";
const INVESTOR_COLUMNS: &str = "id, name, firm, sectors, stage, \
     check_size_min::float8 AS check_size_min, check_size_max::float8 AS check_size_max";

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Fetch a single startup by id
    pub async fn get_startup(&self, id: &str) -> Result<Startup, PostgresError> {
        let uuid = parse_id(id)?;
        let query = format!("SELECT {} FROM startups WHERE id = $1", STARTUP_COLUMNS);

        let row = sqlx::query(&query)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Startup {}", id)))?;

        Ok(startup_from_row(&row))
    }

    /// Fetch a single investor by id
    pub async fn get_investor(&self, id: &str) -> Result<Investor, PostgresError> {
        let uuid = parse_id(id)?;
        let query = format!("SELECT {} FROM investors WHERE id = $1", INVESTOR_COLUMNS);

        let row = sqlx::query(&query)
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Investor {}", id)))?;

        Ok(investor_from_row(&row))
    }

    /// All investors, newest first
    pub async fn list_investors(&self, limit: usize) -> Result<Vec<Investor>, PostgresError> {
        let query = format!(
            "SELECT {} FROM investors ORDER BY created_at DESC NULLS LAST LIMIT $1",
            INVESTOR_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let investors: Vec<Investor> = rows.iter().map(investor_from_row).collect();
        tracing::debug!("Loaded {} investors", investors.len());
        Ok(investors)
    }

    /// Approved startups, highest GOD score first
    pub async fn list_startups(&self, limit: usize) -> Result<Vec<Startup>, PostgresError> {
        let query = format!(
            "SELECT {} FROM startups ORDER BY total_god_score DESC NULLS LAST LIMIT $1",
            STARTUP_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let startups: Vec<Startup> = rows.iter().map(startup_from_row).collect();
        tracing::debug!("Loaded {} startups", startups.len());
        Ok(startups)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn parse_id(id: &str) -> Result<Uuid, PostgresError> {
    Uuid::parse_str(id).map_err(|_| PostgresError::InvalidInput(format!("Invalid id: {}", id)))
}

fn startup_from_row(row: &PgRow) -> Startup {
    let id: Uuid = row.get("id");
    Startup {
        id: id.to_string(),
        name: row.try_get::<String, _>("name").unwrap_or_default(),
        sectors: row
            .try_get::<Option<Vec<String>>, _>("sectors")
            .ok()
            .flatten()
            .unwrap_or_default(),
        total_god_score: row.try_get::<Option<f64>, _>("total_god_score").ok().flatten(),
    }
}

fn investor_from_row(row: &PgRow) -> Investor {
    let id: Uuid = row.get("id");
    Investor {
        id: id.to_string(),
        name: row.try_get::<String, _>("name").unwrap_or_default(),
        firm: row.try_get::<Option<String>, _>("firm").ok().flatten(),
        sectors: row
            .try_get::<Option<Vec<String>>, _>("sectors")
            .ok()
            .flatten()
            .unwrap_or_default(),
        stage: row
            .try_get::<Option<Vec<String>>, _>("stage")
            .ok()
            .flatten()
            .unwrap_or_default(),
        check_size_min: row.try_get::<Option<f64>, _>("check_size_min").ok().flatten(),
        check_size_max: row.try_get::<Option<f64>, _>("check_size_max").ok().flatten(),
    }
}
