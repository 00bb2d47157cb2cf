pub mod poll;
pub mod poll_view;
pub mod poll_vote;

pub use poll::*;
pub use poll_view::*;
pub use poll_vote::*;
