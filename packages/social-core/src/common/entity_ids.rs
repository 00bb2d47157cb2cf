//! Id aliases for the entities the social core touches.
//!
//! Users are owned by the identity service and only ever referenced by id.
//! Relation edges and satellite rows have no id of their own; they are keyed
//! by the ids below.

pub use super::id::Id;

/// Marker type for identities (owned by the identity service).
pub struct User;

/// Marker type for posts.
pub struct Post;

pub type UserId = Id<User>;

pub type PostId = Id<Post>;
