//! Post removal with satellite cleanup

use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::{info, instrument};
use typed_builder::TypedBuilder;

use super::purge::{purge_satellites, CascadeReport};
use crate::common::{require_id, PostId, Result, SocialError, UserId};
use crate::domains::posts::models::Post;
use crate::kernel::{transaction, SocialDeps};

/// Selects posts for bulk removal. At least one criterion is required.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct PostRemovalFilter {
    #[builder(default, setter(strip_option))]
    pub ids: Option<Vec<PostId>>,
    #[builder(default, setter(strip_option))]
    pub author_id: Option<UserId>,
    #[builder(default)]
    pub drafts_only: bool,
}

impl PostRemovalFilter {
    pub fn is_empty(&self) -> bool {
        self.ids.is_none() && self.author_id.is_none() && !self.drafts_only
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push("SELECT p.id FROM posts p WHERE TRUE");
        if let Some(ids) = &self.ids {
            qb.push(" AND p.id = ANY(");
            qb.push_bind(ids.clone());
            qb.push(")");
        }
        if let Some(author_id) = self.author_id {
            qb.push(" AND p.author_id = ");
            qb.push_bind(author_id);
        }
        if self.drafts_only {
            qb.push(" AND p.is_draft = TRUE");
        }
        qb.push(" ORDER BY p.id FOR UPDATE");
    }

    /// Lock and return the ids of every matching post.
    async fn lock_matching(&self, conn: &mut PgConnection) -> Result<Vec<PostId>> {
        let mut qb = QueryBuilder::<Postgres>::new("");
        self.push_sql(&mut qb);
        qb.build_query_scalar::<PostId>()
            .fetch_all(&mut *conn)
            .await
            .map_err(Into::into)
    }
}

/// Delete one post and everything that references it.
#[instrument(skip(deps), fields(post_id = %post_id))]
pub async fn remove_post(post_id: PostId, deps: &SocialDeps) -> Result<()> {
    require_id(post_id, "Post id")?;

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let outcome = delete_one(post_id, &mut tx).await;
    let report = transaction::finish(tx, outcome, "cascade.remove_post").await?;

    info!(satellites = report.total(), ?report, "Post removed");
    Ok(())
}

/// Delete every post matching `filter` and everything that references them.
/// Returns the number of posts removed.
#[instrument(skip(deps))]
pub async fn remove_posts(filter: PostRemovalFilter, deps: &SocialDeps) -> Result<u64> {
    if filter.is_empty() {
        return Err(SocialError::validation("Post removal filter cannot be empty"));
    }
    if filter.ids.as_ref().is_some_and(|ids| ids.is_empty()) {
        return Ok(0);
    }

    let mut tx = transaction::begin(&deps.db_pool).await?;
    let outcome = delete_matching(&filter, &mut tx).await;
    let (removed, report) = transaction::finish(tx, outcome, "cascade.remove_posts").await?;

    info!(removed, satellites = report.total(), ?report, "Posts removed");
    Ok(removed)
}

async fn delete_one(post_id: PostId, conn: &mut PgConnection) -> Result<CascadeReport> {
    Post::find_for_update(post_id, conn)
        .await?
        .ok_or_else(|| SocialError::not_found("Post not found"))?;

    let ids = [post_id];
    let report = purge_satellites(conn, &ids).await?;
    Post::delete_many(&ids, conn).await?;
    Ok(report)
}

async fn delete_matching(
    filter: &PostRemovalFilter,
    conn: &mut PgConnection,
) -> Result<(u64, CascadeReport)> {
    let ids = filter.lock_matching(conn).await?;
    if ids.is_empty() {
        return Ok((0, CascadeReport::default()));
    }

    let report = purge_satellites(conn, &ids).await?;
    let removed = Post::delete_many(&ids, conn).await?;
    Ok((removed, report))
}
