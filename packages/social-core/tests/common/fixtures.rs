//! Test fixtures for creating test data.
//!
//! Posts go through `Post::create`; satellite rows are inserted with raw SQL so
//! cascade tests can seed state without going through the engagement domain.

use anyhow::Result;
use chrono::{Duration, Utc};
use social_core::common::{PostId, UserId};
use social_core::domains::polls::models::NewPoll;
use social_core::domains::posts::models::{NewPost, Post};
use sqlx::PgPool;

/// Create a public text post
pub async fn create_post(pool: &PgPool, author_id: UserId) -> Result<Post> {
    let post = Post::create(
        NewPost::builder()
            .author_id(author_id)
            .body("test post".to_string())
            .build(),
        pool,
    )
    .await?;
    Ok(post)
}

/// Create a private or draft post
pub async fn create_hidden_post(
    pool: &PgPool,
    author_id: UserId,
    is_public: bool,
    is_draft: bool,
) -> Result<Post> {
    let post = Post::create(
        NewPost::builder()
            .author_id(author_id)
            .body("hidden post".to_string())
            .is_public(is_public)
            .is_draft(is_draft)
            .build(),
        pool,
    )
    .await?;
    Ok(post)
}

/// Create a post with a yes/no poll lasting `length_minutes`, created
/// `created_minutes_ago` minutes in the past (negative means in the future).
pub async fn create_poll_post(
    pool: &PgPool,
    author_id: UserId,
    length_minutes: i32,
    created_minutes_ago: i64,
) -> Result<Post> {
    let poll = NewPoll::builder()
        .options(vec!["yes".to_string(), "no".to_string()])
        .minutes(length_minutes)
        .build();

    let post = Post::create(
        NewPost::builder()
            .author_id(author_id)
            .body("poll post".to_string())
            .poll(poll)
            .created_at(Utc::now() - Duration::minutes(created_minutes_ago))
            .build(),
        pool,
    )
    .await?;
    Ok(post)
}

/// Insert one row into every satellite table for `user_id` on `post_id`.
pub async fn seed_satellites(pool: &PgPool, post_id: PostId, user_id: UserId) -> Result<()> {
    for table in ["likes", "reposts", "bookmarks"] {
        sqlx::query(&format!(
            "INSERT INTO {table} (post_id, user_id) VALUES ($1, $2)"
        ))
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    }
    sqlx::query("INSERT INTO post_stats (post_id, user_id, viewed) VALUES ($1, $2, TRUE)")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO poll_votes (post_id, user_id, option_idx) VALUES ($1, $2, 0)")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Rows referencing `post_id` across all satellite tables.
pub async fn satellite_rows(pool: &PgPool, post_id: PostId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT (SELECT COUNT(*) FROM likes WHERE post_id = $1)
             + (SELECT COUNT(*) FROM reposts WHERE post_id = $1)
             + (SELECT COUNT(*) FROM bookmarks WHERE post_id = $1)
             + (SELECT COUNT(*) FROM post_stats WHERE post_id = $1)
             + (SELECT COUNT(*) FROM poll_votes WHERE post_id = $1)
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Number of edges from `from` to `to`, any kind.
pub async fn edge_count(pool: &PgPool, from: UserId, to: UserId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM relation_edges WHERE from_user_id = $1 AND to_user_id = $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
