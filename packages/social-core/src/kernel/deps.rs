//! Dependencies shared by every social core operation.
//!
//! The pool is the transactional storage facility; the identity lookup is the
//! read-only collaborator owned by the identity service. Both sit behind this
//! container so tests can swap the identity service for a mock.

use std::sync::Arc;

use sqlx::PgPool;

use crate::common::{Result, SocialError, UserId};
use crate::kernel::{BaseIdentityLookup, Identity, PgIdentityLookup};

#[derive(Clone)]
pub struct SocialDeps {
    pub db_pool: PgPool,
    pub identities: Arc<dyn BaseIdentityLookup>,
}

impl SocialDeps {
    pub fn new(db_pool: PgPool, identities: Arc<dyn BaseIdentityLookup>) -> Self {
        Self {
            db_pool,
            identities,
        }
    }

    /// Deps that resolve identities from the `users` table of the same database.
    pub fn with_pg_identities(db_pool: PgPool) -> Self {
        let identities = Arc::new(PgIdentityLookup::new(db_pool.clone()));
        Self::new(db_pool, identities)
    }

    /// Resolve an identity or fail with `NotFound(missing_message)`.
    pub async fn require_identity(&self, id: UserId, missing_message: &str) -> Result<Identity> {
        self.identities
            .get_identity(id)
            .await?
            .ok_or_else(|| SocialError::not_found(missing_message))
    }
}
