use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use crate::models::{CompatibilityResult, PairKey, StoredCompatibility};
use crate::services::{ResultSink, ServiceError};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// PostgreSQL store for computed compatibility results
///
/// Holds at most one row per unordered pair; recomputing a pair replaces
/// its row (last writer wins).
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

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
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Insert or replace the result for a pair
    pub async fn upsert(&self, record: &StoredCompatibility) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO compatibility_results
                (id, pair_key, user_a, user_b, overall_score, passed, result, computed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (pair_key)
            DO UPDATE SET
                user_a = EXCLUDED.user_a,
                user_b = EXCLUDED.user_b,
                overall_score = EXCLUDED.overall_score,
                passed = EXCLUDED.passed,
                result = EXCLUDED.result,
                computed_at = EXCLUDED.computed_at
        "#;

        sqlx::query(query)
            .bind(uuid::Uuid::new_v4())
            .bind(record.pair_key.as_str())
            .bind(&record.user_a)
            .bind(&record.user_b)
            .bind(record.result.overall_score)
            .bind(record.result.dealbreakers.passed)
            .bind(Json(&record.result))
            .bind(record.computed_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "Stored compatibility for {} (score {:.3})",
            record.pair_key,
            record.result.overall_score
        );

        Ok(())
    }

    /// Fetch the stored result for a pair
    pub async fn fetch(&self, key: &PairKey) -> Result<Option<StoredCompatibility>, PostgresError> {
        let query = r#"
            SELECT user_a, user_b, result, computed_at
            FROM compatibility_results
            WHERE pair_key = $1
        "#;

        let Some(row) = sqlx::query(query)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let user_a: String = row.try_get("user_a")?;
        let user_b: String = row.try_get("user_b")?;
        let Json(result): Json<CompatibilityResult> = row.try_get("result")?;

        Ok(Some(StoredCompatibility {
            pair_key: PairKey::new(&user_a, &user_b),
            user_a,
            user_b,
            result,
            computed_at: row.try_get("computed_at")?,
        }))
    }

    /// Remove a pair's result once it can no longer be scored
    pub async fn remove(&self, key: &PairKey) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM compatibility_results WHERE pair_key = $1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    pub async fn ping(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ResultSink for PostgresClient {
    async fn upsert_result(&self, record: &StoredCompatibility) -> Result<(), ServiceError> {
        Ok(self.upsert(record).await?)
    }

    async fn get_result(&self, key: &PairKey) -> Result<Option<StoredCompatibility>, ServiceError> {
        Ok(self.fetch(key).await?)
    }

    async fn remove_result(&self, key: &PairKey) -> Result<bool, ServiceError> {
        Ok(self.remove(key).await?)
    }

    async fn health_check(&self) -> Result<bool, ServiceError> {
        Ok(self.ping().await?)
    }
}
