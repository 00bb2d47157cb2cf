//! Relations domain - directional follow/mute/block edges
//!
//! Only this domain writes `relation_edges`. Follow and block are mutually
//! exclusive per ordered pair; mute is independent of both.

pub mod activities;
pub mod models;

pub use activities::{
    add_relation, list_incoming, list_outgoing, relation_state, remove_relation, RelationState,
};
pub use models::{
    RelationEdge, RelationKind, RelationOutcome, RelationRequest, RelationUsers,
};
