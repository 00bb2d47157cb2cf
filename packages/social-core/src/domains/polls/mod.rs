//! Poll domain - time-boxed voting with exactly-once votes
//!
//! Write path: `set_vote`. Read path: `load_poll_views` + `overlay_votes`,
//! called by the post read path.

pub mod activities;
pub mod models;
pub mod overlay;
pub mod window;

pub use activities::set_vote;
pub use models::{NewPoll, Poll, PollOption, PollOptionView, PollView, PollVote};
pub use overlay::{load_poll_views, overlay_votes};
pub use window::{max_poll_length, poll_length, PollState, PollWindow, MAX_POLL_DAYS};
