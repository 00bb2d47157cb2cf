use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ContentKind, Post};
use crate::common::{PostId, UserId};
use crate::domains::polls::models::PollView;
use crate::kernel::Identity;

/// The viewer's relations and engagement with respect to one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionState {
    pub is_following: bool,
    pub is_muted: bool,
    pub is_blocked: bool,
    pub is_liked: bool,
    pub is_bookmarked: bool,
    pub is_reposted: bool,
}

/// Post author as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    pub id: UserId,
    /// `None` when the identity service no longer knows the author.
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub is_following: bool,
    pub is_muted: bool,
    pub is_blocked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub content_kind: ContentKind,
    pub body: Option<String>,
    pub is_public: bool,
    pub is_draft: bool,
    pub schedule: Option<DateTime<Utc>>,
    pub like_count: i32,
    pub repost_count: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: AuthorView,
    pub poll: Option<PollView>,
    pub logged_in_user_action_state: ActionState,
}

impl PostView {
    pub fn new(
        post: Post,
        author: Option<&Identity>,
        poll: Option<PollView>,
        action_state: ActionState,
    ) -> Self {
        Self {
            id: post.id,
            content_kind: post.content_kind,
            body: post.body,
            is_public: post.is_public,
            is_draft: post.is_draft,
            schedule: post.schedule,
            like_count: post.like_count,
            repost_count: post.repost_count,
            created_at: post.created_at,
            created_by: AuthorView {
                id: post.author_id,
                username: author.map(|a| a.username.clone()),
                display_name: author.and_then(|a| a.display_name.clone()),
                is_following: action_state.is_following,
                is_muted: action_state.is_muted,
                is_blocked: action_state.is_blocked,
            },
            poll,
            logged_in_user_action_state: action_state,
        }
    }
}
