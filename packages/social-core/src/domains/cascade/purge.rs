//! Satellite purge stage of post removal.
//!
//! Satellite tables carry no foreign key to `posts`, so nothing removes their
//! rows implicitly. Removal paths call [`purge_satellites`] inside the same
//! transaction that deletes the posts.

use serde::Serialize;
use sqlx::PgConnection;

use crate::common::{PostId, Result};

/// Tables that reference posts by id without a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteTable {
    Reposts,
    Likes,
    PostStats,
    Bookmarks,
    PollVotes,
}

impl SatelliteTable {
    /// Purge order.
    pub const ALL: [SatelliteTable; 5] = [
        SatelliteTable::Reposts,
        SatelliteTable::Likes,
        SatelliteTable::PostStats,
        SatelliteTable::Bookmarks,
        SatelliteTable::PollVotes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SatelliteTable::Reposts => "reposts",
            SatelliteTable::Likes => "likes",
            SatelliteTable::PostStats => "post_stats",
            SatelliteTable::Bookmarks => "bookmarks",
            SatelliteTable::PollVotes => "poll_votes",
        }
    }
}

/// Rows deleted per satellite table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub reposts: u64,
    pub likes: u64,
    pub post_stats: u64,
    pub bookmarks: u64,
    pub poll_votes: u64,
}

impl CascadeReport {
    pub fn total(&self) -> u64 {
        self.reposts + self.likes + self.post_stats + self.bookmarks + self.poll_votes
    }

    fn record(&mut self, table: SatelliteTable, rows: u64) {
        let slot = match table {
            SatelliteTable::Reposts => &mut self.reposts,
            SatelliteTable::Likes => &mut self.likes,
            SatelliteTable::PostStats => &mut self.post_stats,
            SatelliteTable::Bookmarks => &mut self.bookmarks,
            SatelliteTable::PollVotes => &mut self.poll_votes,
        };
        *slot += rows;
    }
}

/// Delete every satellite row that references any of `post_ids`.
///
/// One statement per table regardless of how many posts are purged. Running
/// it twice is harmless; the second run reports zero rows.
pub async fn purge_satellites(conn: &mut PgConnection, post_ids: &[PostId]) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    if post_ids.is_empty() {
        return Ok(report);
    }

    for table in SatelliteTable::ALL {
        let sql = format!("DELETE FROM {} WHERE post_id = ANY($1)", table.name());
        let result = sqlx::query(&sql).bind(post_ids).execute(&mut *conn).await?;
        report.record(table, result.rows_affected());
    }

    Ok(report)
}
