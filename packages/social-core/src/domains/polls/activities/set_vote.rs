//! Cast a vote on a post's poll

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::{info, instrument};

use crate::common::{require_id, PostId, Result, SocialError, UserId};
use crate::domains::polls::models::{Poll, PollOption, PollOptionView, PollVote};
use crate::domains::polls::window::PollState;
use crate::domains::posts::models::Post;
use crate::kernel::{transaction, SocialDeps};

/// Record `user_id`'s vote for option `option_idx` of the poll on `post_id`.
///
/// The vote row and the counter bump commit together. A second vote by the
/// same user fails on the `poll_votes` primary key, so concurrent duplicates
/// leave exactly one row and one increment.
#[instrument(skip(deps), fields(post_id = %post_id, user_id = %user_id))]
pub async fn set_vote(
    post_id: PostId,
    option_idx: i32,
    user_id: UserId,
    deps: &SocialDeps,
) -> Result<PollOptionView> {
    require_id(post_id, "Post id")?;
    require_id(user_id, "User id")?;
    deps.require_identity(user_id, "Logged in user not found")
        .await?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let outcome = cast_vote(post_id, option_idx, user_id, Utc::now(), &mut tx).await;
    let option = transaction::finish(tx, outcome, "poll.set_vote").await?;

    info!(vote_count = option.vote_count, "Poll vote recorded");

    Ok(PollOptionView {
        text: option.text,
        vote_count: option.vote_count,
        is_logged_in_user_voted: true,
    })
}

async fn cast_vote(
    post_id: PostId,
    option_idx: i32,
    user_id: UserId,
    now: DateTime<Utc>,
    conn: &mut PgConnection,
) -> Result<PollOption> {
    let post = Post::find_for_share(post_id, conn)
        .await?
        .ok_or_else(|| SocialError::not_found("Post not found"))?;
    let poll = Poll::find(post_id, &mut *conn)
        .await?
        .ok_or_else(|| SocialError::not_found("Poll not found"))?;

    match poll.window(post.created_at)?.state_at(now) {
        PollState::NotStarted => return Err(SocialError::conflict("Poll has not started yet")),
        PollState::Closed => return Err(SocialError::conflict("Poll has ended")),
        PollState::Open => {}
    }

    let options = PollOption::list(post_id, &mut *conn).await?;
    if !options.iter().any(|o| o.idx == option_idx) {
        return Err(SocialError::validation("Invalid poll option"));
    }

    PollVote::insert(post_id, user_id, option_idx, conn).await?;

    PollOption::increment_vote(post_id, option_idx, conn)
        .await?
        .ok_or_else(|| SocialError::not_found("Poll option not found"))
}
