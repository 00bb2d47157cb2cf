//! Engagement domain - likes, reposts, bookmarks and per-user post stats
//!
//! Owns individual satellite inserts and deletes and the cached counters on
//! the post. Bulk deletion on post removal belongs to the cascade domain.

pub mod activities;
pub mod models;

pub use activities::*;
pub use models::{EngagementMarks, PostStats, SatelliteKind, SatelliteRow, StatsUpdate};
