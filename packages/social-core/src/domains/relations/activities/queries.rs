//! Relation read helpers

use tracing::instrument;

use crate::common::{Result, UserId};
use crate::domains::relations::models::{RelationEdge, RelationKind};
use crate::kernel::SocialDeps;

/// Relation flags one user holds toward another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationState {
    pub is_following: bool,
    pub is_muted: bool,
    pub is_blocked: bool,
}

pub async fn relation_state(viewer: UserId, target: UserId, deps: &SocialDeps) -> Result<RelationState> {
    let edges = RelationEdge::find_toward(viewer, &[target], &deps.db_pool).await?;
    let has = |kind: RelationKind| edges.iter().any(|e| e.kind == kind);
    Ok(RelationState {
        is_following: has(RelationKind::Follow),
        is_muted: has(RelationKind::Mute),
        is_blocked: has(RelationKind::Block),
    })
}

/// Users `user_id` follows (or mutes/blocks), newest first.
#[instrument(skip(deps), fields(user_id = %user_id, kind = %kind))]
pub async fn list_outgoing(
    user_id: UserId,
    kind: RelationKind,
    limit: i64,
    offset: i64,
    deps: &SocialDeps,
) -> Result<Vec<UserId>> {
    Ok(
        RelationEdge::list_outgoing(user_id, kind, limit.clamp(1, 100), offset.max(0), &deps.db_pool)
            .await?
            .into_iter()
            .map(|edge| edge.to_user_id)
            .collect(),
    )
}

/// Users that follow (or mute/block) `user_id`, newest first.
#[instrument(skip(deps), fields(user_id = %user_id, kind = %kind))]
pub async fn list_incoming(
    user_id: UserId,
    kind: RelationKind,
    limit: i64,
    offset: i64,
    deps: &SocialDeps,
) -> Result<Vec<UserId>> {
    Ok(
        RelationEdge::list_incoming(user_id, kind, limit.clamp(1, 100), offset.max(0), &deps.db_pool)
            .await?
            .into_iter()
            .map(|edge| edge.from_user_id)
            .collect(),
    )
}
