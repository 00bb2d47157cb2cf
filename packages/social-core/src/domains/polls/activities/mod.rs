pub mod set_vote;

pub use set_vote::set_vote;
