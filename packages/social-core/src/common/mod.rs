// Common types shared across the social core

pub mod entity_ids;
pub mod error;
pub mod id;

pub use entity_ids::*;
pub use error::{require_id, unique_violation, violated_unique_constraint, Result, SocialError};
pub use id::Id;
