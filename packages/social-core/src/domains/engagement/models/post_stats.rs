use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgExecutor};

use crate::common::{PostId, Result, UserId};

/// Per-user interaction flags on a post. Flags only ever go from false to true.
#[derive(FromRow, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub post_id: PostId,
    pub user_id: UserId,
    pub viewed: bool,
    pub detail_opened: bool,
    pub profile_opened: bool,
    pub shared: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    #[serde(default)]
    pub viewed: bool,
    #[serde(default)]
    pub detail_opened: bool,
    #[serde(default)]
    pub profile_opened: bool,
    #[serde(default)]
    pub shared: bool,
}

impl StatsUpdate {
    pub fn is_empty(&self) -> bool {
        !(self.viewed || self.detail_opened || self.profile_opened || self.shared)
    }
}

impl PostStats {
    /// Insert the row or OR the new flags into the existing one.
    pub async fn upsert(
        post_id: PostId,
        user_id: UserId,
        update: StatsUpdate,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO post_stats (post_id, user_id, viewed, detail_opened, profile_opened, shared)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (post_id, user_id) DO UPDATE SET
                viewed = post_stats.viewed OR EXCLUDED.viewed,
                detail_opened = post_stats.detail_opened OR EXCLUDED.detail_opened,
                profile_opened = post_stats.profile_opened OR EXCLUDED.profile_opened,
                shared = post_stats.shared OR EXCLUDED.shared,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(update.viewed)
        .bind(update.detail_opened)
        .bind(update.profile_opened)
        .bind(update.shared)
        .fetch_one(&mut *conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find<'e>(
        post_id: PostId,
        user_id: UserId,
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM post_stats WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
            .map_err(Into::into)
    }

    pub async fn count_for_post<'e>(post_id: PostId, executor: impl PgExecutor<'e>) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_stats WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(executor)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_detected() {
        assert!(StatsUpdate::default().is_empty());
        assert!(!StatsUpdate {
            shared: true,
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn missing_flags_deserialize_as_false() {
        let update: StatsUpdate = serde_json::from_str(r#"{"detailOpened": true}"#).unwrap();
        assert!(update.detail_opened);
        assert!(!update.viewed);
    }
}
