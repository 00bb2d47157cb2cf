pub mod post;
pub mod post_query;
pub mod post_view;

pub use post::*;
pub use post_query::*;
pub use post_view::*;
