//! Remove a follow/mute/block edge

use sqlx::PgConnection;
use tracing::{info, instrument};

use super::shared::{outcome, validate};
use crate::common::{Result, SocialError};
use crate::domains::relations::models::{RelationEdge, RelationOutcome, RelationRequest};
use crate::kernel::{transaction, SocialDeps};

/// Remove the edge `request.from_user_id -> request.to_user_id` of `request.kind`.
///
/// Fails with `NotFound` ("You are not following this user", ...) and changes
/// nothing when the edge does not exist.
#[instrument(skip(deps), fields(from = %request.from_user_id, to = %request.to_user_id, kind = %request.kind))]
pub async fn remove_relation(
    request: RelationRequest,
    deps: &SocialDeps,
) -> Result<RelationOutcome> {
    let users = validate(&request, deps).await?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let deleted = delete_edge(&request, &mut tx).await;
    transaction::finish(tx, deleted, "relation.remove").await?;

    info!("Relation removed");

    outcome(&request, users, deps).await
}

async fn delete_edge(request: &RelationRequest, conn: &mut PgConnection) -> Result<()> {
    let not_found = || {
        SocialError::not_found(format!(
            "You are not {} this user",
            request.kind.progressive()
        ))
    };

    RelationEdge::find_for_update(request.from_user_id, request.to_user_id, request.kind, conn)
        .await?
        .ok_or_else(not_found)?;

    // The row lock makes a concurrent remover wait; once it commits, this
    // delete sees no row and reports the same NotFound.
    let removed =
        RelationEdge::delete(request.from_user_id, request.to_user_id, request.kind, conn).await?;
    if removed == 0 {
        return Err(not_found());
    }

    Ok(())
}
