//! Posts domain - post storage, visibility and the read path
//!
//! Post creation belongs to the content service; `Post::create` is the storage
//! half it calls. Removal goes through the cascade domain.

pub mod activities;
pub mod models;
pub mod visibility;

pub use activities::{enrich_posts, get_post_by_id, load_post_view, query_posts};
pub use models::{
    ActionState, AuthorView, ContentKind, NewPost, Post, PostCounter, PostQuery, PostView,
};
pub use visibility::VisibilityFilter;
