//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container and one migration run are shared by every test in
//! the binary. Tests isolate themselves by working with freshly generated ids.

use std::sync::Arc;

use anyhow::{Context, Result};
use social_core::kernel::{MockIdentityLookup, SocialDeps, TestDependencies};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=social_core=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;
        social_core::run_migrations(&pool).await?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Per-test context: a fresh pool plus deps wired to the mock identity service.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let alice = ctx.user("alice");
///     // ...
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
    pub identities: Arc<MockIdentityLookup>,
    pub deps: SocialDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        let TestDependencies { identities, deps } = TestDependencies::new(db_pool.clone());

        Ok(Self {
            db_pool,
            identities,
            deps,
        })
    }

    /// Register a user with the mock identity service.
    pub fn user(&self, username: &str) -> social_core::common::UserId {
        self.identities.add_user(username)
    }
}
