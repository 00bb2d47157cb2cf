//! Cascade domain - removes posts together with their satellite records
//!
//! Deleting a post first purges likes, reposts, bookmarks, post stats and poll
//! votes in the same transaction. The post's own poll rows go with the post
//! through their foreign key.

pub mod purge;
pub mod removal;

pub use purge::{purge_satellites, CascadeReport, SatelliteTable};
pub use removal::{remove_post, remove_posts, PostRemovalFilter};
