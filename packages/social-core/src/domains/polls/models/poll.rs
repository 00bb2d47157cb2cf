use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgExecutor};
use typed_builder::TypedBuilder;

use crate::common::{PostId, Result, SocialError};
use crate::domains::polls::window::{max_poll_length, poll_length, PollWindow, MAX_POLL_DAYS};

/// Poll embedded in a post. Its rows belong to the post document and are
/// removed with it.
#[derive(FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub post_id: PostId,
    pub length_days: i32,
    pub length_hours: i32,
    pub length_minutes: i32,
}

#[derive(FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub post_id: PostId,
    pub idx: i32,
    pub text: String,
    pub vote_count: i32,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct NewPoll {
    pub options: Vec<String>,
    #[builder(default)]
    pub days: i32,
    #[builder(default)]
    pub hours: i32,
    #[builder(default)]
    pub minutes: i32,
}

impl NewPoll {
    pub fn validate(&self) -> Result<()> {
        if self.options.len() < 2 {
            return Err(SocialError::validation("A poll needs at least two options"));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(SocialError::validation("Poll options cannot be empty"));
        }
        if self.days < 0 || self.hours < 0 || self.minutes < 0 {
            return Err(SocialError::validation("Poll length cannot be negative"));
        }
        let length = poll_length(self.days, self.hours, self.minutes);
        if length <= Duration::zero() {
            return Err(SocialError::validation("Poll length must be positive"));
        }
        if length > max_poll_length() {
            return Err(SocialError::validation(format!(
                "Poll length cannot exceed {} days",
                MAX_POLL_DAYS
            )));
        }
        Ok(())
    }
}

impl Poll {
    pub fn length(&self) -> Duration {
        poll_length(self.length_days, self.length_hours, self.length_minutes)
    }

    /// Voting window for a poll on a post created at `post_created_at`.
    pub fn window(&self, post_created_at: DateTime<Utc>) -> Result<PollWindow> {
        PollWindow::new(post_created_at, self.length())
    }

    pub async fn insert(
        post_id: PostId,
        new_poll: &NewPoll,
        conn: &mut PgConnection,
    ) -> Result<(Self, Vec<PollOption>)> {
        let poll = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO polls (post_id, length_days, length_hours, length_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(new_poll.days)
        .bind(new_poll.hours)
        .bind(new_poll.minutes)
        .fetch_one(&mut *conn)
        .await?;

        let idxs: Vec<i32> = (0..new_poll.options.len() as i32).collect();
        let options = sqlx::query_as::<_, PollOption>(
            r#"
            INSERT INTO poll_options (post_id, idx, text)
            SELECT $1, o.idx, o.text FROM UNNEST($2::INTEGER[], $3::TEXT[]) AS o(idx, text)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(&idxs)
        .bind(&new_poll.options)
        .fetch_all(&mut *conn)
        .await?;

        Ok((poll, options))
    }

    pub async fn find<'e>(post_id: PostId, executor: impl PgExecutor<'e>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM polls WHERE post_id = $1")
            .bind(post_id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn find_many<'e>(
        post_ids: &[PostId],
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>("SELECT * FROM polls WHERE post_id = ANY($1)")
            .bind(post_ids)
            .fetch_all(executor)
            .await
            .map_err(Into::into)
    }
}

impl PollOption {
    pub async fn list<'e>(post_id: PostId, executor: impl PgExecutor<'e>) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM poll_options WHERE post_id = $1 ORDER BY idx")
            .bind(post_id)
            .fetch_all(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn list_many<'e>(
        post_ids: &[PostId],
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Self>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>(
            "SELECT * FROM poll_options WHERE post_id = ANY($1) ORDER BY post_id, idx",
        )
        .bind(post_ids)
        .fetch_all(executor)
        .await
        .map_err(Into::into)
    }

    /// Atomically bump the vote count of one option.
    ///
    /// Only the poll engine calls this, inside the transaction that inserted
    /// the matching vote row.
    pub async fn increment_vote(
        post_id: PostId,
        idx: i32,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE poll_options
            SET vote_count = vote_count + 1
            WHERE post_id = $1 AND idx = $2
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(idx)
        .fetch_optional(&mut *conn)
        .await
        .map_err(Into::into)
    }
}
