//! Scoped transaction discipline shared by every mutating operation.
//!
//! An operation opens a transaction with [`begin`], runs its storage steps
//! against `&mut PgConnection` and hands the outcome to [`finish`]:
//!
//! ```ignore
//! let mut tx = transaction::begin(&deps.db_pool).await?;
//! let outcome = insert_edge(&mut tx, from, to, kind).await;
//! let edge = transaction::finish(tx, outcome, "relation.add").await?;
//! ```
//!
//! `finish` commits on `Ok` and rolls back on `Err` before returning the
//! error. Any other exit (an early `?` between `begin` and `finish`, a
//! cancelled future, a panic) drops the `Transaction`, which rolls back and
//! returns the connection to the pool.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};

use crate::common::Result;

pub type Tx = Transaction<'static, Postgres>;

pub async fn begin(pool: &PgPool) -> Result<Tx> {
    Ok(pool.begin().await?)
}

pub async fn finish<T>(tx: Tx, outcome: Result<T>, operation: &'static str) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            debug!(operation, "transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                // The connection is closed instead of being returned to the pool
                warn!(operation, error = %rollback_err, "rollback failed");
            }
            debug!(operation, error = %err, "transaction aborted");
            Err(err)
        }
    }
}
