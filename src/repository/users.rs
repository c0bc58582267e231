use async_trait::async_trait;

use super::database::Database;
use crate::models::{AuthRecord, AUTH_TABLE_NAME};

/// Credential storage used by the login endpoint and `user add`
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, user_id: &str) -> Result<Option<AuthRecord>, sqlx::Error>;

    /// Insert the user, or replace the password hash if it already exists
    async fn upsert_user(&self, user_id: &str, hashed_password: &str) -> Result<(), sqlx::Error>;
}

/// Backs `GET /ready`
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl UserStore for Database {
    async fn find_user(&self, user_id: &str) -> Result<Option<AuthRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT user_id, hashed_password, created_at, updated_at FROM {}.{} WHERE user_id = $1",
            self.schema(),
            AUTH_TABLE_NAME
        );
        let query = sqlx::query_as::<_, AuthRecord>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool());

        self.observe(&sql, query).await
    }

    async fn upsert_user(&self, user_id: &str, hashed_password: &str) -> Result<(), sqlx::Error> {
        let sql = format!(
            "INSERT INTO {}.{} (user_id, hashed_password) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET hashed_password = EXCLUDED.hashed_password, updated_at = NOW()",
            self.schema(),
            AUTH_TABLE_NAME
        );
        let query = sqlx::query(&sql)
            .bind(user_id)
            .bind(hashed_password)
            .execute(self.pool());

        self.observe(&sql, query).await.map(|_| ())
    }
}

#[async_trait]
impl ReadinessCheck for Database {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Database::ping(self).await
    }
}
