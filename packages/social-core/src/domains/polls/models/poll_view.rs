use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Poll, PollOption};
use crate::common::Result;
use crate::domains::polls::window::PollState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionView {
    pub text: String,
    pub vote_count: i32,
    pub is_logged_in_user_voted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollView {
    pub length_days: i32,
    pub length_hours: i32,
    pub length_minutes: i32,
    pub ends_at: DateTime<Utc>,
    pub state: PollState,
    /// Ordered by option index.
    pub options: Vec<PollOptionView>,
}

impl From<PollOption> for PollOptionView {
    fn from(option: PollOption) -> Self {
        Self {
            text: option.text,
            vote_count: option.vote_count,
            is_logged_in_user_voted: false,
        }
    }
}

impl PollView {
    pub fn build(
        poll: &Poll,
        mut options: Vec<PollOption>,
        post_created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        options.sort_by_key(|o| o.idx);
        let window = poll.window(post_created_at)?;
        Ok(Self {
            length_days: poll.length_days,
            length_hours: poll.length_hours,
            length_minutes: poll.length_minutes,
            ends_at: window.ends_at,
            state: window.state_at(now),
            options: options.into_iter().map(PollOptionView::from).collect(),
        })
    }

    /// Flag the option the viewer picked. Out-of-range indexes are ignored.
    pub fn mark_voted(&mut self, option_idx: i32) {
        if let Some(option) = usize::try_from(option_idx)
            .ok()
            .and_then(|idx| self.options.get_mut(idx))
        {
            option.is_logged_in_user_voted = true;
        }
    }
}
