// Mock implementations for testing
//
// Provides an in-memory identity service that can be injected into SocialDeps.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseIdentityLookup, Identity, SocialDeps};
use crate::common::UserId;

// =============================================================================
// Mock Identity Lookup
// =============================================================================

pub struct MockIdentityLookup {
    identities: Arc<Mutex<HashMap<UserId, Identity>>>,
    lookups: Arc<Mutex<Vec<UserId>>>,
}

impl MockIdentityLookup {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(Mutex::new(HashMap::new())),
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register an identity under a fresh id and return that id
    pub fn add_user(&self, username: &str) -> UserId {
        let id = UserId::new();
        self.identities.lock().unwrap().insert(
            id,
            Identity {
                id,
                username: username.to_string(),
                display_name: None,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Forget an identity, as if the identity service deleted it
    pub fn remove_user(&self, id: UserId) {
        self.identities.lock().unwrap().remove(&id);
    }

    /// All ids that were looked up, in call order
    pub fn lookups(&self) -> Vec<UserId> {
        self.lookups.lock().unwrap().clone()
    }
}

impl Default for MockIdentityLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityLookup for MockIdentityLookup {
    async fn get_identity(&self, id: UserId) -> Result<Option<Identity>> {
        self.lookups.lock().unwrap().push(id);
        Ok(self.identities.lock().unwrap().get(&id).cloned())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Deps wired to a real pool and the mock identity service
pub struct TestDependencies {
    pub identities: Arc<MockIdentityLookup>,
    pub deps: SocialDeps,
}

impl TestDependencies {
    pub fn new(db_pool: PgPool) -> Self {
        let identities = Arc::new(MockIdentityLookup::new());
        let deps = SocialDeps::new(db_pool, identities.clone());
        Self { identities, deps }
    }
}
