use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgExecutor};

use crate::common::{unique_violation, PostId, Result, UserId};

/// One identity's vote on one post's poll.
///
/// The primary key on `(post_id, user_id)` is the exactly-once guard: a second
/// insert for the same pair fails, whatever the interleaving.
#[derive(FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollVote {
    pub post_id: PostId,
    pub user_id: UserId,
    pub option_idx: i32,
    pub created_at: DateTime<Utc>,
}

impl PollVote {
    pub async fn insert(
        post_id: PostId,
        user_id: UserId,
        option_idx: i32,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO poll_votes (post_id, user_id, option_idx)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(option_idx)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| unique_violation(e, "You have already voted on this poll"))
    }

    pub async fn find<'e>(
        post_id: PostId,
        user_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM poll_votes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// The caller's votes across a batch of posts, in one query.
    pub async fn find_for_user<'e>(
        user_id: UserId,
        post_ids: &[PostId],
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>(
            "SELECT * FROM poll_votes WHERE user_id = $1 AND post_id = ANY($2)",
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_post<'e>(post_id: PostId, executor: impl PgExecutor<'e>) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM poll_votes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(executor)
            .await
            .map_err(Into::into)
    }
}
