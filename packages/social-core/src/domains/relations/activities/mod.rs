pub mod add_relation;
pub mod queries;
pub mod remove_relation;
mod shared;

pub use add_relation::add_relation;
pub use queries::{list_incoming, list_outgoing, relation_state, RelationState};
pub use remove_relation::remove_relation;
