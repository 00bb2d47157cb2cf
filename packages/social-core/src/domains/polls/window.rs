//! Poll voting window.
//!
//! A poll opens when its post is created and stays open for its configured
//! length. Both bounds are inclusive.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::common::{Result, SocialError};

/// Longest poll a post may carry, in days.
pub const MAX_POLL_DAYS: i64 = 7;

pub fn max_poll_length() -> Duration {
    Duration::days(MAX_POLL_DAYS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    NotStarted,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Total poll length from its day/hour/minute parts.
pub fn poll_length(days: i32, hours: i32, minutes: i32) -> Duration {
    Duration::days(i64::from(days))
        + Duration::hours(i64::from(hours))
        + Duration::minutes(i64::from(minutes))
}

impl PollWindow {
    /// Fails with `Validation` when the end falls outside the representable
    /// time range (possible only for rows written without length validation).
    pub fn new(starts_at: DateTime<Utc>, length: Duration) -> Result<Self> {
        let ends_at = starts_at
            .checked_add_signed(length)
            .ok_or_else(|| SocialError::validation("Poll length is out of range"))?;
        Ok(Self { starts_at, ends_at })
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> PollState {
        if now < self.starts_at {
            PollState::NotStarted
        } else if now > self.ends_at {
            PollState::Closed
        } else {
            PollState::Open
        }
    }
}
