//! Create a follow/mute/block edge

use sqlx::PgConnection;
use tracing::{debug, info, instrument};

use super::shared::{outcome, validate};
use crate::common::Result;
use crate::domains::relations::models::{RelationEdge, RelationOutcome, RelationRequest};
use crate::kernel::{transaction, SocialDeps};

/// Add the edge `request.from_user_id -> request.to_user_id` of `request.kind`.
///
/// Following removes an existing block of the same pair and blocking removes
/// an existing follow, in the same transaction as the insert. A duplicate edge
/// (including the losing side of two concurrent identical adds) fails with
/// `Conflict`.
#[instrument(skip(deps), fields(from = %request.from_user_id, to = %request.to_user_id, kind = %request.kind))]
pub async fn add_relation(request: RelationRequest, deps: &SocialDeps) -> Result<RelationOutcome> {
    let users = validate(&request, deps).await?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let inserted = insert_edge(&request, &mut tx).await;
    let edge = transaction::finish(tx, inserted, "relation.add").await?;

    info!(created_at = %edge.created_at, "Relation added");

    outcome(&request, users, deps).await
}

async fn insert_edge(request: &RelationRequest, conn: &mut PgConnection) -> Result<RelationEdge> {
    if let Some(opposite) = request.kind.opposite() {
        let removed =
            RelationEdge::delete(request.from_user_id, request.to_user_id, opposite, conn).await?;
        if removed > 0 {
            debug!(replaced = %opposite, "Replaced opposite relation");
        }
    }

    RelationEdge::insert(request.from_user_id, request.to_user_id, request.kind, conn).await
}
