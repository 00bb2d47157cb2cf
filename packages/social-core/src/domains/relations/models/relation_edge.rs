use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor};

use crate::common::{violated_unique_constraint, Result, SocialError, UserId};

/// Partial unique index that keeps follow and block exclusive per ordered pair.
const FOLLOW_BLOCK_EXCLUSIVE_INDEX: &str = "relation_edges_follow_block_exclusive";

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "relation_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Follow,
    Mute,
    Block,
}

impl RelationKind {
    /// The kind an insert of `self` displaces for the same ordered pair.
    ///
    /// Mute has no opposite; it coexists with either follow or block.
    pub fn opposite(self) -> Option<RelationKind> {
        match self {
            RelationKind::Follow => Some(RelationKind::Block),
            RelationKind::Block => Some(RelationKind::Follow),
            RelationKind::Mute => None,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            RelationKind::Follow => "follow",
            RelationKind::Mute => "mute",
            RelationKind::Block => "block",
        }
    }

    pub fn progressive(self) -> &'static str {
        match self {
            RelationKind::Follow => "following",
            RelationKind::Mute => "muting",
            RelationKind::Block => "blocking",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

// ============================================================================
// RelationEdge Model
// ============================================================================

/// Directional follow/mute/block edge. Keyed by `(from, to, kind)`; it has no
/// identity of its own.
#[derive(FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationEdge {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub kind: RelationKind,
    pub created_at: DateTime<Utc>,
}

impl RelationEdge {
    /// Insert an edge. Unique violations become `Conflict`; there is no
    /// existence pre-check here, the constraints are the guard.
    pub async fn insert(
        from_user_id: UserId,
        to_user_id: UserId,
        kind: RelationKind,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO relation_edges (from_user_id, to_user_id, kind)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(kind)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| match violated_unique_constraint(&err) {
            Some(FOLLOW_BLOCK_EXCLUSIVE_INDEX) => {
                SocialError::conflict("Relationship with this user changed concurrently")
            }
            Some(_) => {
                SocialError::conflict(format!("You are already {} this user", kind.progressive()))
            }
            None => err.into(),
        })
    }

    /// Delete an edge if present. Returns the number of rows removed (0 or 1).
    pub async fn delete(
        from_user_id: UserId,
        to_user_id: UserId,
        kind: RelationKind,
        conn: &mut PgConnection,
    ) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM relation_edges WHERE from_user_id = $1 AND to_user_id = $2 AND kind = $3",
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(kind)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn find<'e>(
        from_user_id: UserId,
        to_user_id: UserId,
        kind: RelationKind,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM relation_edges WHERE from_user_id = $1 AND to_user_id = $2 AND kind = $3",
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(kind)
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Like `find`, but locks the row until the transaction ends.
    pub async fn find_for_update(
        from_user_id: UserId,
        to_user_id: UserId,
        kind: RelationKind,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM relation_edges
            WHERE from_user_id = $1 AND to_user_id = $2 AND kind = $3
            FOR UPDATE
            "#,
        )
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(kind)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Into::into)
    }

    /// Every edge `from_user_id` holds toward any of `to_user_ids`, in one query.
    pub async fn find_toward<'e>(
        from_user_id: UserId,
        to_user_ids: &[UserId],
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        if to_user_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>(
            "SELECT * FROM relation_edges WHERE from_user_id = $1 AND to_user_id = ANY($2)",
        )
        .bind(from_user_id)
        .bind(to_user_ids)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Edges of `kind` going out of `from_user_id`, newest first.
    pub async fn list_outgoing<'e>(
        from_user_id: UserId,
        kind: RelationKind,
        limit: i64,
        offset: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM relation_edges
            WHERE from_user_id = $1 AND kind = $2
            ORDER BY created_at DESC, to_user_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(from_user_id)
        .bind(kind)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Edges of `kind` pointing at `to_user_id`, newest first.
    pub async fn list_incoming<'e>(
        to_user_id: UserId,
        kind: RelationKind,
        limit: i64,
        offset: i64,
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM relation_edges
            WHERE to_user_id = $1 AND kind = $2
            ORDER BY created_at DESC, from_user_id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(to_user_id)
        .bind(kind)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn count_incoming<'e>(
        to_user_id: UserId,
        kind: RelationKind,
        executor: impl PgExecutor<'e>,
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relation_edges WHERE to_user_id = $1 AND kind = $2",
        )
        .bind(to_user_id)
        .bind(kind)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }
}
