// Social Core - relation graph and dependent-content consistency
//
// This crate owns follow/mute/block edges between users, removal of posts
// together with every record that references them, and exactly-once poll
// voting. Hosts call the domain activities with an explicit caller id and a
// `SocialDeps` container.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
