//! Identity lookup backed by the identity service's `users` table.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{BaseIdentityLookup, Identity};
use crate::common::UserId;

pub struct PgIdentityLookup {
    pool: PgPool,
}

impl PgIdentityLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseIdentityLookup for PgIdentityLookup {
    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>> {
        sqlx::query_as::<_, Identity>(
            "SELECT id, username, display_name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn get_identities(&self, ids: &[UserId]) -> Result<Vec<Identity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Identity>(
            "SELECT id, username, display_name, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }
}
