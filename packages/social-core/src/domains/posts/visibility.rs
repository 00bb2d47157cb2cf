//! Visibility filter for content reads.
//!
//! Every post read path renders this predicate into its WHERE clause. It is
//! derived from relation edges: a viewer never sees posts by authors they
//! block. The bypass is for administrative and cascade paths only.

use sqlx::{Postgres, QueryBuilder};

use crate::common::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityFilter {
    viewer: Option<UserId>,
    bypass: bool,
}

impl VisibilityFilter {
    pub fn for_viewer(viewer: UserId) -> Self {
        Self {
            viewer: Some(viewer),
            bypass: false,
        }
    }

    /// Public posts only, with no viewer-specific exclusions.
    pub fn anonymous() -> Self {
        Self {
            viewer: None,
            bypass: false,
        }
    }

    /// Sees everything, including private, draft and block-hidden posts.
    pub fn internal() -> Self {
        Self {
            viewer: None,
            bypass: true,
        }
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    /// Append the predicate for a `posts` table aliased as `p`.
    pub fn push_predicate(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if self.bypass {
            qb.push("TRUE");
            return;
        }

        qb.push(
            "p.is_public = TRUE AND p.is_draft = FALSE \
             AND (p.schedule IS NULL OR p.schedule <= NOW())",
        );

        if let Some(viewer) = self.viewer {
            qb.push(
                " AND NOT EXISTS (SELECT 1 FROM relation_edges r \
                 WHERE r.kind = 'block' AND r.to_user_id = p.author_id AND r.from_user_id = ",
            );
            qb.push_bind(viewer);
            qb.push(")");
        }
    }
}
