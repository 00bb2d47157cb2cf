use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{PostId, Result, SocialError, UserId};
use crate::domains::polls::models::{NewPoll, Poll};
use crate::kernel::transaction;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "post_content_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[default]
    Text,
    Poll,
    Gif,
    Images,
    Video,
}

/// Cached counters on `posts`. The likes/reposts tables are authoritative;
/// these columns only save a COUNT(*) on the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostCounter {
    Likes,
    Reposts,
}

impl PostCounter {
    fn column(self) -> &'static str {
        match self {
            PostCounter::Likes => "like_count",
            PostCounter::Reposts => "repost_count",
        }
    }
}

// ============================================================================
// Post Model
// ============================================================================

#[derive(FromRow, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub content_kind: ContentKind,
    pub body: Option<String>,

    // Visibility
    pub is_public: bool,
    pub is_draft: bool,
    pub schedule: Option<DateTime<Utc>>,

    // Cached projections
    pub like_count: i32,
    pub repost_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the content-creation path.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewPost {
    pub author_id: UserId,
    #[builder(default)]
    pub content_kind: ContentKind,
    #[builder(default, setter(strip_option))]
    pub body: Option<String>,
    #[builder(default = true)]
    pub is_public: bool,
    #[builder(default = false)]
    pub is_draft: bool,
    #[builder(default, setter(strip_option))]
    pub schedule: Option<DateTime<Utc>>,
    #[builder(default, setter(strip_option))]
    pub poll: Option<NewPoll>,
    /// Also the moment a poll on this post opens.
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn has_poll(&self) -> bool {
        self.content_kind == ContentKind::Poll
    }

    /// Insert a post and, for poll posts, its poll and options in one transaction.
    pub async fn create(new_post: NewPost, pool: &PgPool) -> Result<Self> {
        if let Some(poll) = &new_post.poll {
            poll.validate()?;
        }
        if new_post.content_kind == ContentKind::Poll && new_post.poll.is_none() {
            return Err(SocialError::validation("Poll posts require a poll"));
        }

        let mut tx = transaction::begin(pool).await?;
        let outcome = Self::insert_with_poll(&new_post, &mut tx).await;
        transaction::finish(tx, outcome, "post.create").await
    }

    async fn insert_with_poll(new_post: &NewPost, conn: &mut PgConnection) -> Result<Self> {
        let content_kind = if new_post.poll.is_some() {
            ContentKind::Poll
        } else {
            new_post.content_kind
        };

        let post = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO posts (id, author_id, content_kind, body, is_public, is_draft, schedule, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(PostId::new())
        .bind(new_post.author_id)
        .bind(content_kind)
        .bind(&new_post.body)
        .bind(new_post.is_public)
        .bind(new_post.is_draft)
        .bind(new_post.schedule)
        .bind(new_post.created_at)
        .fetch_one(&mut *conn)
        .await?;

        if let Some(poll) = &new_post.poll {
            Poll::insert(post.id, poll, conn).await?;
        }

        Ok(post)
    }

    pub async fn find_by_id<'e>(id: PostId, executor: impl PgExecutor<'e>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    /// Load the post and hold a share lock on it until the transaction ends.
    ///
    /// Satellite writers take this lock so a concurrent removal (which holds
    /// `FOR UPDATE`) either finishes first or waits for them.
    pub async fn find_for_share(id: PostId, conn: &mut PgConnection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(Into::into)
    }

    /// Lock the post for removal. Blocks satellite writers holding `FOR SHARE`.
    pub async fn find_for_update(id: PostId, conn: &mut PgConnection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_ids(ids: &[PostId], pool: &PgPool) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Self>("SELECT * FROM posts WHERE id = ANY($1) ORDER BY created_at DESC, id DESC")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn exists<'e>(id: PostId, executor: impl PgExecutor<'e>) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await
            .map_err(Into::into)
    }

    /// Shift a cached counter, never below zero.
    pub async fn adjust_counter(
        id: PostId,
        counter: PostCounter,
        delta: i32,
        conn: &mut PgConnection,
    ) -> Result<()> {
        let column = counter.column();
        let sql = format!(
            "UPDATE posts SET {column} = GREATEST({column} + $2, 0), updated_at = NOW() WHERE id = $1"
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(delta)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Rebuild the cached counters from the likes/reposts tables.
    pub async fn recompute_counters(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE posts p
            SET like_count = (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id)::INTEGER,
                repost_count = (SELECT COUNT(*) FROM reposts r WHERE r.post_id = p.id)::INTEGER,
                updated_at = NOW()
            WHERE p.id = $1
            RETURNING p.*
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete post rows. Only the cascade calls this, after purging satellites
    /// in the same transaction.
    pub async fn delete_many(ids: &[PostId], conn: &mut PgConnection) -> Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_public_text_post() {
        let author = UserId::new();
        let new_post = NewPost::builder().author_id(author).body("hello".to_string()).build();

        assert_eq!(new_post.content_kind, ContentKind::Text);
        assert!(new_post.is_public);
        assert!(!new_post.is_draft);
        assert!(new_post.poll.is_none());
        assert_eq!(new_post.body.as_deref(), Some("hello"));
    }

    #[test]
    fn counter_columns() {
        assert_eq!(PostCounter::Likes.column(), "like_count");
        assert_eq!(PostCounter::Reposts.column(), "repost_count");
    }
}
