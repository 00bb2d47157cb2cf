use sqlx::PgConnection;
use tracing::{debug, instrument};

use crate::common::{require_id, PostId, Result, SocialError, UserId};
use crate::domains::engagement::models::{PostStats, StatsUpdate};
use crate::domains::posts::models::Post;
use crate::kernel::{transaction, SocialDeps};

/// Record which interactions `user_id` had with a post. Flags are sticky.
#[instrument(skip(deps), fields(post_id = %post_id, user_id = %user_id))]
pub async fn record_stats(
    post_id: PostId,
    user_id: UserId,
    update: StatsUpdate,
    deps: &SocialDeps,
) -> Result<PostStats> {
    require_id(post_id, "Post id")?;
    require_id(user_id, "User id")?;
    if update.is_empty() {
        return Err(SocialError::validation("No post stats to record"));
    }
    deps.require_identity(user_id, "Logged in user not found")
        .await?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let outcome = upsert_stats(post_id, user_id, update, &mut tx).await;
    let stats = transaction::finish(tx, outcome, "engagement.record_stats").await?;

    debug!(?update, "Post stats recorded");
    Ok(stats)
}

async fn upsert_stats(
    post_id: PostId,
    user_id: UserId,
    update: StatsUpdate,
    conn: &mut PgConnection,
) -> Result<PostStats> {
    Post::find_for_share(post_id, conn)
        .await?
        .ok_or_else(|| SocialError::not_found("Post not found"))?;
    PostStats::upsert(post_id, user_id, update, conn).await
}

/// Reset the cached like/repost counters from the satellite tables.
#[instrument(skip(deps), fields(post_id = %post_id))]
pub async fn recompute_counters(post_id: PostId, deps: &SocialDeps) -> Result<Post> {
    require_id(post_id, "Post id")?;
    let post = Post::recompute_counters(post_id, &deps.db_pool)
        .await?
        .ok_or_else(|| SocialError::not_found("Post not found"))?;

    debug!(
        like_count = post.like_count,
        repost_count = post.repost_count,
        "Counters recomputed"
    );
    Ok(post)
}
