//! Post read paths
//!
//! Every path applies the visibility filter (unless it is an internal path
//! acting on an id the caller already holds), then enriches the whole page in
//! batch: author identities, polls with the viewer's votes, action state.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::common::{require_id, PostId, Result, SocialError, UserId};
use crate::domains::polls::{load_poll_views, overlay_votes};
use crate::domains::posts::activities::action_state::action_states;
use crate::domains::posts::models::{Post, PostQuery, PostView};
use crate::domains::posts::visibility::VisibilityFilter;
use crate::kernel::{Identity, SocialDeps};

/// Feed page for `viewer`.
#[instrument(skip(query, deps), fields(viewer = %viewer))]
pub async fn query_posts(
    viewer: UserId,
    query: &PostQuery,
    deps: &SocialDeps,
) -> Result<Vec<PostView>> {
    require_id(viewer, "User id")?;
    let filter = VisibilityFilter::for_viewer(viewer);
    let posts = Post::find_visible(&filter, query, &deps.db_pool).await?;
    debug!(count = posts.len(), "Visible posts loaded");
    enrich_posts(viewer, posts, deps).await
}

/// A single post, as long as `viewer` may see it.
#[instrument(skip(deps), fields(viewer = %viewer, post_id = %post_id))]
pub async fn get_post_by_id(viewer: UserId, post_id: PostId, deps: &SocialDeps) -> Result<PostView> {
    require_id(viewer, "User id")?;
    require_id(post_id, "Post id")?;

    let query = PostQuery::builder().ids(vec![post_id]).limit(1).build();
    let filter = VisibilityFilter::for_viewer(viewer);
    let posts = Post::find_visible(&filter, &query, &deps.db_pool).await?;

    enrich_posts(viewer, posts, deps)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| SocialError::not_found("Post not found"))
}

/// A single post without the visibility filter, for paths that act on an id
/// the caller already holds (relation and engagement results).
pub async fn load_post_view(
    viewer: UserId,
    post_id: PostId,
    deps: &SocialDeps,
) -> Result<Option<PostView>> {
    let Some(post) = Post::find_by_id(post_id, &deps.db_pool).await? else {
        return Ok(None);
    };
    Ok(enrich_posts(viewer, vec![post], deps).await?.into_iter().next())
}

/// Turn a page of posts into views for `viewer`, preserving order.
pub async fn enrich_posts(
    viewer: UserId,
    posts: Vec<Post>,
    deps: &SocialDeps,
) -> Result<Vec<PostView>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let mut author_ids: Vec<UserId> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort();
    author_ids.dedup();
    let authors: HashMap<UserId, Identity> = deps
        .identities
        .get_identities(&author_ids)
        .await?
        .into_iter()
        .map(|identity| (identity.id, identity))
        .collect();

    let mut polls = load_poll_views(&posts, Utc::now(), &deps.db_pool).await?;
    let states = action_states(viewer, &posts, &deps.db_pool).await?;

    let mut views: Vec<PostView> = posts
        .into_iter()
        .map(|post| {
            let poll = polls.remove(&post.id);
            let state = states.get(&post.id).copied().unwrap_or_default();
            let author = authors.get(&post.author_id);
            PostView::new(post, author, poll, state)
        })
        .collect();

    overlay_votes(viewer, &mut views, &deps.db_pool).await?;

    Ok(views)
}
