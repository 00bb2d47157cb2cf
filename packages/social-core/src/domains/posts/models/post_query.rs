use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use typed_builder::TypedBuilder;

use super::{ContentKind, Post};
use crate::common::{PostId, Result, UserId};
use crate::domains::posts::visibility::VisibilityFilter;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Filters for a feed page. Pages are keyset-paginated on `created_at`.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PostQuery {
    #[builder(default, setter(strip_option))]
    pub author_id: Option<UserId>,
    #[builder(default, setter(strip_option))]
    pub content_kind: Option<ContentKind>,
    #[builder(default, setter(strip_option))]
    pub ids: Option<Vec<PostId>>,
    /// Only posts created strictly before this instant.
    #[builder(default, setter(strip_option))]
    pub before: Option<DateTime<Utc>>,
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub limit: i64,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PostQuery {
    pub fn page_size(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    fn push_sql(&self, filter: &VisibilityFilter, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push("SELECT p.* FROM posts p WHERE ");
        filter.push_predicate(qb);

        if let Some(author_id) = self.author_id {
            qb.push(" AND p.author_id = ");
            qb.push_bind(author_id);
        }
        if let Some(content_kind) = self.content_kind {
            qb.push(" AND p.content_kind = ");
            qb.push_bind(content_kind);
        }
        if let Some(ids) = &self.ids {
            qb.push(" AND p.id = ANY(");
            qb.push_bind(ids.clone());
            qb.push(")");
        }
        if let Some(before) = self.before {
            qb.push(" AND p.created_at < ");
            qb.push_bind(before);
        }

        qb.push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        qb.push_bind(self.page_size());
    }
}

impl Post {
    /// Posts matching `query` that `filter` lets through, newest first.
    pub async fn find_visible(
        filter: &VisibilityFilter,
        query: &PostQuery,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let mut qb = QueryBuilder::<Postgres>::new("");
        query.push_sql(filter, &mut qb);
        qb.build_query_as::<Self>()
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
