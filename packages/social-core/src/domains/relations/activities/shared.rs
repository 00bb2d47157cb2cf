//! Steps shared by add and remove

use tracing::warn;

use crate::common::{require_id, Result, SocialError};
use crate::domains::posts::load_post_view;
use crate::domains::posts::models::Post;
use crate::domains::relations::models::{RelationOutcome, RelationRequest, RelationUsers};
use crate::kernel::SocialDeps;

/// Reject malformed requests and resolve both identities.
pub(super) async fn validate(request: &RelationRequest, deps: &SocialDeps) -> Result<RelationUsers> {
    require_id(request.from_user_id, "Logged in user id")?;
    require_id(request.to_user_id, "Target user id")?;

    if request.from_user_id == request.to_user_id {
        return Err(SocialError::validation(format!(
            "You cannot {} yourself",
            request.kind.verb()
        )));
    }

    let logged_in_user = deps
        .require_identity(request.from_user_id, "Logged in user not found")
        .await?;
    let target_user = deps
        .require_identity(request.to_user_id, "User not found")
        .await?;

    if let Some(post_id) = request.post_id {
        require_id(post_id, "Post id")?;
        if !Post::exists(post_id, &deps.db_pool).await? {
            return Err(SocialError::not_found("Post not found"));
        }
    }

    Ok(RelationUsers {
        logged_in_user,
        target_user,
    })
}

/// Build the result after commit.
///
/// The post read is best effort: the edge change is already durable, so a post
/// removed in the meantime downgrades the result to the user snapshot.
pub(super) async fn outcome(
    request: &RelationRequest,
    users: RelationUsers,
    deps: &SocialDeps,
) -> Result<RelationOutcome> {
    let Some(post_id) = request.post_id else {
        return Ok(RelationOutcome::Users(users));
    };

    match load_post_view(request.from_user_id, post_id, deps).await? {
        Some(post) => Ok(RelationOutcome::Post(Box::new(post))),
        None => {
            warn!(post_id = %post_id, "Post disappeared before enrichment");
            Ok(RelationOutcome::Users(users))
        }
    }
}
