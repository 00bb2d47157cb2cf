//! Like, repost and bookmark toggles
//!
//! All three share one implementation keyed by [`SatelliteKind`]. The post row
//! is held `FOR SHARE` while the satellite row changes, so a concurrent
//! removal (which takes `FOR UPDATE`) either runs first and the action fails
//! with `NotFound`, or waits and purges the new row.

use sqlx::PgConnection;
use tracing::{info, instrument};

use crate::common::{require_id, PostId, Result, SocialError, UserId};
use crate::domains::engagement::models::{SatelliteKind, SatelliteRow};
use crate::domains::posts::load_post_view;
use crate::domains::posts::models::{Post, PostView};
use crate::kernel::{transaction, SocialDeps};

pub async fn like_post(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<PostView> {
    add_satellite(SatelliteKind::Like, post_id, user_id, deps).await
}

pub async fn unlike_post(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<PostView> {
    remove_satellite(SatelliteKind::Like, post_id, user_id, deps).await
}

pub async fn repost_post(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<PostView> {
    add_satellite(SatelliteKind::Repost, post_id, user_id, deps).await
}

pub async fn undo_repost(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<PostView> {
    remove_satellite(SatelliteKind::Repost, post_id, user_id, deps).await
}

pub async fn bookmark_post(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<PostView> {
    add_satellite(SatelliteKind::Bookmark, post_id, user_id, deps).await
}

pub async fn remove_bookmark(
    post_id: PostId,
    user_id: UserId,
    deps: &SocialDeps,
) -> Result<PostView> {
    remove_satellite(SatelliteKind::Bookmark, post_id, user_id, deps).await
}

#[instrument(skip(deps), fields(post_id = %post_id, user_id = %user_id))]
pub async fn add_satellite(
    kind: SatelliteKind,
    post_id: PostId,
    user_id: UserId,
    deps: &SocialDeps,
) -> Result<PostView> {
    check_caller(post_id, user_id, deps).await?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let outcome = insert_row(kind, post_id, user_id, &mut tx).await;
    transaction::finish(tx, outcome, "engagement.add").await?;

    info!(table = kind.table(), "Engagement added");
    refreshed_view(post_id, user_id, deps).await
}

#[instrument(skip(deps), fields(post_id = %post_id, user_id = %user_id))]
pub async fn remove_satellite(
    kind: SatelliteKind,
    post_id: PostId,
    user_id: UserId,
    deps: &SocialDeps,
) -> Result<PostView> {
    check_caller(post_id, user_id, deps).await?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let outcome = delete_row(kind, post_id, user_id, &mut tx).await;
    transaction::finish(tx, outcome, "engagement.remove").await?;

    info!(table = kind.table(), "Engagement removed");
    refreshed_view(post_id, user_id, deps).await
}

async fn check_caller(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<()> {
    require_id(post_id, "Post id")?;
    require_id(user_id, "User id")?;
    deps.require_identity(user_id, "Logged in user not found")
        .await?;
    Ok(())
}

async fn insert_row(
    kind: SatelliteKind,
    post_id: PostId,
    user_id: UserId,
    conn: &mut PgConnection,
) -> Result<()> {
    lock_post(post_id, conn).await?;
    SatelliteRow::insert(kind, post_id, user_id, conn).await?;
    if let Some(counter) = kind.counter() {
        Post::adjust_counter(post_id, counter, 1, conn).await?;
    }
    Ok(())
}

async fn delete_row(
    kind: SatelliteKind,
    post_id: PostId,
    user_id: UserId,
    conn: &mut PgConnection,
) -> Result<()> {
    lock_post(post_id, conn).await?;
    let removed = SatelliteRow::delete(kind, post_id, user_id, conn).await?;
    if removed == 0 {
        return Err(SocialError::not_found(format!(
            "You have not {} this post",
            kind.past_tense()
        )));
    }
    if let Some(counter) = kind.counter() {
        Post::adjust_counter(post_id, counter, -1, conn).await?;
    }
    Ok(())
}

async fn lock_post(post_id: PostId, conn: &mut PgConnection) -> Result<Post> {
    Post::find_for_share(post_id, conn)
        .await?
        .ok_or_else(|| SocialError::not_found("Post not found"))
}

async fn refreshed_view(post_id: PostId, user_id: UserId, deps: &SocialDeps) -> Result<PostView> {
    load_post_view(user_id, post_id, deps)
        .await?
        .ok_or_else(|| SocialError::not_found("Post not found"))
}
