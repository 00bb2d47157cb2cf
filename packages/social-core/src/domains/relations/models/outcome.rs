use serde::{Deserialize, Serialize};

use super::RelationKind;
use crate::common::{PostId, UserId};
use crate::domains::posts::models::PostView;
use crate::kernel::Identity;

/// A relation mutation requested by the authenticated caller `from_user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRequest {
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub kind: RelationKind,
    /// Post whose action state should be returned after the mutation.
    #[serde(default)]
    pub post_id: Option<PostId>,
}

impl RelationRequest {
    pub fn new(from_user_id: UserId, to_user_id: UserId, kind: RelationKind) -> Self {
        Self {
            from_user_id,
            to_user_id,
            kind,
            post_id: None,
        }
    }

    pub fn with_post(mut self, post_id: PostId) -> Self {
        self.post_id = Some(post_id);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationUsers {
    pub logged_in_user: Identity,
    pub target_user: Identity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RelationOutcome {
    Users(RelationUsers),
    Post(Box<PostView>),
}

impl RelationOutcome {
    pub fn into_post(self) -> Option<PostView> {
        match self {
            RelationOutcome::Post(post) => Some(*post),
            RelationOutcome::Users(_) => None,
        }
    }

    pub fn into_users(self) -> Option<RelationUsers> {
        match self {
            RelationOutcome::Users(users) => Some(users),
            RelationOutcome::Post(_) => None,
        }
    }
}
