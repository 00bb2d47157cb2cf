pub mod action_state;
pub mod queries;

pub use action_state::action_states;
pub use queries::{enrich_posts, get_post_by_id, load_post_view, query_posts};
