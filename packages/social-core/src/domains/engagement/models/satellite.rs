use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor};

use crate::common::{unique_violation, PostId, Result, UserId};
use crate::domains::posts::models::PostCounter;

/// Per-user marks on a post that share one shape: `(post_id, user_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatelliteKind {
    Like,
    Repost,
    Bookmark,
}

impl SatelliteKind {
    pub fn table(self) -> &'static str {
        match self {
            SatelliteKind::Like => "likes",
            SatelliteKind::Repost => "reposts",
            SatelliteKind::Bookmark => "bookmarks",
        }
    }

    /// Cached counter on the post that mirrors this table, if any.
    pub fn counter(self) -> Option<PostCounter> {
        match self {
            SatelliteKind::Like => Some(PostCounter::Likes),
            SatelliteKind::Repost => Some(PostCounter::Reposts),
            SatelliteKind::Bookmark => None,
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            SatelliteKind::Like => "liked",
            SatelliteKind::Repost => "reposted",
            SatelliteKind::Bookmark => "bookmarked",
        }
    }
}

#[derive(FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteRow {
    pub post_id: PostId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl SatelliteRow {
    pub async fn insert(
        kind: SatelliteKind,
        post_id: PostId,
        user_id: UserId,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        let sql = format!(
            "INSERT INTO {} (post_id, user_id) VALUES ($1, $2) RETURNING *",
            kind.table()
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(post_id)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                unique_violation(e, format!("You have already {} this post", kind.past_tense()))
            })
    }

    /// Remove one user's row. Returns the number of rows removed (0 or 1).
    pub async fn delete(
        kind: SatelliteKind,
        post_id: PostId,
        user_id: UserId,
        conn: &mut PgConnection,
    ) -> Result<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE post_id = $1 AND user_id = $2",
            kind.table()
        );
        let result = sqlx::query(&sql)
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_for_post<'e>(
        kind: SatelliteKind,
        post_id: PostId,
        executor: impl PgExecutor<'e>,
    ) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE post_id = $1", kind.table());
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(post_id)
            .fetch_one(executor)
            .await
            .map_err(Into::into)
    }
}

/// Which of a page of posts one user has liked, reposted or bookmarked.
#[derive(Debug, Clone, Default)]
pub struct EngagementMarks {
    pub liked: HashSet<PostId>,
    pub reposted: HashSet<PostId>,
    pub bookmarked: HashSet<PostId>,
}

#[derive(FromRow)]
struct MarkRow {
    kind: String,
    post_id: PostId,
}

impl EngagementMarks {
    /// One query for all three tables.
    pub async fn for_user<'e>(
        user_id: UserId,
        post_ids: &[PostId],
        executor: impl PgExecutor<'e>,
    ) -> Result<Self> {
        if post_ids.is_empty() {
            return Ok(Self::default());
        }

        let rows = sqlx::query_as::<_, MarkRow>(
            r#"
            SELECT 'like'::TEXT AS kind, post_id FROM likes WHERE user_id = $1 AND post_id = ANY($2)
            UNION ALL
            SELECT 'repost'::TEXT AS kind, post_id FROM reposts WHERE user_id = $1 AND post_id = ANY($2)
            UNION ALL
            SELECT 'bookmark'::TEXT AS kind, post_id FROM bookmarks WHERE user_id = $1 AND post_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(executor)
        .await?;

        let mut marks = Self::default();
        for row in rows {
            match row.kind.as_str() {
                "like" => marks.liked.insert(row.post_id),
                "repost" => marks.reposted.insert(row.post_id),
                _ => marks.bookmarked.insert(row.post_id),
            };
        }
        Ok(marks)
    }

    pub fn has(&self, kind: SatelliteKind, post_id: &PostId) -> bool {
        match kind {
            SatelliteKind::Like => self.liked.contains(post_id),
            SatelliteKind::Repost => self.reposted.contains(post_id),
            SatelliteKind::Bookmark => self.bookmarked.contains(post_id),
        }
    }
}
