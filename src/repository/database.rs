use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgQueryResult};
use sqlx::types::Json;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::query_logger::{QueryEvent, QueryLogger};
use crate::config::Config;
use crate::logging::{LogEvent, LogRecord, LogStore, LoggerHandle};
use crate::models::{AUTH_TABLE_NAME, INDEX_TABLE_NAME};

const MAX_CONNECTIONS: u32 = 4;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// PostgreSQL access with every statement routed through the query hook
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    schema: String,
    hook: QueryLogger,
    logger: LoggerHandle,
}

impl Database {
    /// Open the pool, verify connectivity, and create the schema
    pub async fn connect(config: &Config, logger: LoggerHandle) -> Result<Self> {
        let options = PgConnectOptions::from_str(&config.postgres_dsn)
            .context("Invalid PostgreSQL DSN")?
            .application_name(&config.api_name)
            .options([("search_path", format!("{},public", config.postgres_schema))]);

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
            .connect_with(options)
            .await
            .context("Failed to connect to PostgreSQL")?;

        let db = Self::from_pool(
            pool,
            &config.postgres_schema,
            QueryLogger::new(config.postgres_log_level),
            logger,
        );

        db.ping().await.context("PostgreSQL ping failed")?;
        db.logger
            .log_or_trace(
                LogEvent::info("Connected to PostgreSQL")
                    .module("database")
                    .field("schema", db.schema.as_str()),
            )
            .await;

        db.ensure_schema().await?;
        Ok(db)
    }

    pub fn from_pool(pool: PgPool, schema: &str, hook: QueryLogger, logger: LoggerHandle) -> Self {
        Self {
            pool,
            schema: schema.to_string(),
            hook,
            logger,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Time `fut`, hand the outcome to the query hook, and return it unchanged
    pub(crate) async fn observe<T, F>(&self, sql: &str, fut: F) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        let started = Instant::now();
        let result = fut.await;

        let event = QueryEvent {
            query: sql,
            elapsed: started.elapsed(),
            error: result.as_ref().err().map(|e| e.to_string()),
        };

        if let Some(log) = self.hook.evaluate(&event) {
            self.logger.log_or_trace(log).await;
        }

        result
    }

    pub async fn execute(&self, sql: &str) -> Result<PgQueryResult, sqlx::Error> {
        self.observe(sql, sqlx::query(sql).execute(&self.pool)).await
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        self.execute("SELECT 1").await.map(|_| ())
    }

    async fn ensure_schema(&self) -> Result<()> {
        let statements = [
            format!("CREATE SCHEMA IF NOT EXISTS {}", self.schema),
            format!(
                "CREATE TABLE IF NOT EXISTS {}.{} (
                    user_id TEXT PRIMARY KEY,
                    hashed_password TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )",
                self.schema, AUTH_TABLE_NAME
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}.{} (
                    id BIGSERIAL PRIMARY KEY,
                    \"index\" TEXT NOT NULL,
                    company_name TEXT NOT NULL,
                    industry TEXT NOT NULL,
                    tradingsymbol TEXT NOT NULL,
                    series TEXT NOT NULL,
                    isin_code TEXT NOT NULL
                )",
                self.schema, INDEX_TABLE_NAME
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}.\"logs\" (
                    id BIGSERIAL PRIMARY KEY,
                    \"timestamp\" TIMESTAMPTZ NOT NULL,
                    \"level\" TEXT NOT NULL,
                    \"message\" TEXT NOT NULL,
                    \"module\" TEXT NOT NULL,
                    \"data\" JSONB
                )",
                self.schema
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_logs_timestamp ON {}.\"logs\" (\"timestamp\")",
                self.schema
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_logs_module ON {}.\"logs\" (\"module\")",
                self.schema
            ),
        ];

        for sql in &statements {
            self.execute(sql)
                .await
                .with_context(|| format!("Schema setup failed: {}", sql))?;
        }

        self.logger
            .log_or_trace(
                LogEvent::info("Database schema ready")
                    .module("database")
                    .field("schema", self.schema.as_str()),
            )
            .await;

        Ok(())
    }
}

const INSERT_LOG: &str = "INSERT INTO \"logs\" (\"timestamp\", \"level\", \"message\", \"module\", \"data\") \
     VALUES ($1, $2, $3, $4, $5)";

#[async_trait]
impl LogStore for Database {
    async fn insert_log(&self, record: &LogRecord) -> Result<(), sqlx::Error> {
        let query = sqlx::query(INSERT_LOG)
            .bind(record.timestamp)
            .bind(&record.level)
            .bind(&record.message)
            .bind(&record.module)
            .bind(Json(&record.data))
            .execute(&self.pool);

        self.observe(INSERT_LOG, query).await.map(|_| ())
    }
}

/// Wrap a shared database as the structured logger's store
pub fn log_store(db: &Database) -> Arc<dyn LogStore> {
    Arc::new(db.clone())
}
