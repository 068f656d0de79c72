//! Postgres-backed attribute store.
//!
//! Expects the host schema to provide:
//!
//! ```sql
//! CREATE TABLE user_attributes (
//!     user_id UUID NOT NULL,
//!     name    TEXT NOT NULL,
//!     value   TEXT NOT NULL,
//!     PRIMARY KEY (user_id, name)
//! );
//! ```

use super::AttributeStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Attribute store backed by the host service's Postgres pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttributeStore for PostgresStore {
    async fn get(&self, user: Uuid, name: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT value FROM user_attributes WHERE user_id = $1 AND name = $2",
        )
        .bind(user)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user attribute")
    }

    async fn set(&self, user: Uuid, name: &str, value: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO user_attributes (user_id, name, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, name) DO UPDATE SET value = EXCLUDED.value
            ",
        )
        .bind(user)
        .bind(name)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("Failed to upsert user attribute")?;

        Ok(())
    }

    async fn delete(&self, user: Uuid, name: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_attributes WHERE user_id = $1 AND name = $2")
            .bind(user)
            .bind(name)
            .execute(&self.pool)
            .await
            .context("Failed to delete user attribute")?;

        Ok(())
    }
}
