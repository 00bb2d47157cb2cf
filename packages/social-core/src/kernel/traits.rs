// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Naming convention: Base* for trait names (e.g., BaseIdentityLookup)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::UserId;

// =============================================================================
// Identity Lookup Trait (Infrastructure - owned by the identity service)
// =============================================================================

/// Snapshot of an identity as the identity service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait BaseIdentityLookup: Send + Sync {
    /// Resolve an id to an identity. `Ok(None)` means the identity does not exist.
    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>>;

    /// Resolve many ids at once; missing ids are simply absent from the result.
    async fn get_identities(&self, ids: &[UserId]) -> Result<Vec<Identity>> {
        // Default implementation resolves one at a time
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(identity) = self.get_identity(*id).await? {
                found.push(identity);
            }
        }
        Ok(found)
    }
}
