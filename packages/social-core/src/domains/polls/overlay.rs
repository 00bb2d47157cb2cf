//! Poll data for the post read path.
//!
//! Both helpers work on a whole page of posts at once: polls and options are
//! loaded with two queries and the viewer's votes with one, however many posts
//! the page holds.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{PostId, Result, UserId};
use crate::domains::polls::models::{Poll, PollOption, PollView, PollVote};
use crate::domains::posts::models::{Post, PostView};

/// Build poll views for every poll post in `posts`.
pub async fn load_poll_views(
    posts: &[Post],
    now: DateTime<Utc>,
    pool: &PgPool,
) -> Result<HashMap<PostId, PollView>> {
    let poll_post_ids: Vec<PostId> = posts.iter().filter(|p| p.has_poll()).map(|p| p.id).collect();
    if poll_post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let polls = Poll::find_many(&poll_post_ids, pool).await?;
    let mut options_by_post: HashMap<PostId, Vec<PollOption>> = HashMap::new();
    for option in PollOption::list_many(&poll_post_ids, pool).await? {
        options_by_post.entry(option.post_id).or_default().push(option);
    }

    let created_at: HashMap<PostId, DateTime<Utc>> =
        posts.iter().map(|p| (p.id, p.created_at)).collect();

    let mut views = HashMap::with_capacity(polls.len());
    for poll in polls {
        let Some(post_created_at) = created_at.get(&poll.post_id).copied() else {
            continue;
        };
        let options = options_by_post.remove(&poll.post_id).unwrap_or_default();
        let view = PollView::build(&poll, options, post_created_at, now)?;
        views.insert(poll.post_id, view);
    }

    Ok(views)
}

/// Mark the option the viewer voted for on every poll in `posts`.
pub async fn overlay_votes(viewer: UserId, posts: &mut [PostView], pool: &PgPool) -> Result<()> {
    let poll_post_ids: Vec<PostId> = posts
        .iter()
        .filter(|p| p.poll.is_some())
        .map(|p| p.id)
        .collect();
    if poll_post_ids.is_empty() {
        return Ok(());
    }

    let voted: HashMap<PostId, i32> = PollVote::find_for_user(viewer, &poll_post_ids, pool)
        .await?
        .into_iter()
        .map(|vote| (vote.post_id, vote.option_idx))
        .collect();

    for post in posts.iter_mut() {
        if let (Some(poll), Some(idx)) = (post.poll.as_mut(), voted.get(&post.id)) {
            poll.mark_voted(*idx);
        }
    }

    Ok(())
}
