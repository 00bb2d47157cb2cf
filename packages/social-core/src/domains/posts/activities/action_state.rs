//! Viewer action state for a page of posts

use std::collections::HashMap;

use sqlx::PgPool;

use crate::common::{PostId, Result, UserId};
use crate::domains::engagement::models::{EngagementMarks, SatelliteKind};
use crate::domains::posts::models::{ActionState, Post};
use crate::domains::relations::models::{RelationEdge, RelationKind};

/// Compute `viewer`'s action state for every post in `posts`.
///
/// Two queries regardless of page size: one for the viewer's edges toward the
/// page's authors, one for the viewer's likes/reposts/bookmarks on the page.
pub async fn action_states(
    viewer: UserId,
    posts: &[Post],
    pool: &PgPool,
) -> Result<HashMap<PostId, ActionState>> {
    let mut author_ids: Vec<UserId> = posts
        .iter()
        .map(|p| p.author_id)
        .filter(|id| *id != viewer)
        .collect();
    author_ids.sort();
    author_ids.dedup();

    let post_ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();

    let mut relations: HashMap<UserId, Vec<RelationKind>> = HashMap::new();
    for edge in RelationEdge::find_toward(viewer, &author_ids, pool).await? {
        relations.entry(edge.to_user_id).or_default().push(edge.kind);
    }
    let marks = EngagementMarks::for_user(viewer, &post_ids, pool).await?;

    Ok(posts
        .iter()
        .map(|post| {
            let kinds = relations.get(&post.author_id);
            let has = |kind: RelationKind| kinds.map_or(false, |k| k.contains(&kind));
            let state = ActionState {
                is_following: has(RelationKind::Follow),
                is_muted: has(RelationKind::Mute),
                is_blocked: has(RelationKind::Block),
                is_liked: marks.has(SatelliteKind::Like, &post.id),
                is_bookmarked: marks.has(SatelliteKind::Bookmark, &post.id),
                is_reposted: marks.has(SatelliteKind::Repost, &post.id),
            };
            (post.id, state)
        })
        .collect())
}
