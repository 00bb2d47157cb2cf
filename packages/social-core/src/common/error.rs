use thiserror::Error;

use super::id::Id;

/// Errors returned by every social core operation.
///
/// Callers branch on the variant (and on the message for the not-found and
/// conflict cases) to decide whether a retry makes sense, so the messages are
/// part of the contract.
#[derive(Error, Debug)]
pub enum SocialError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T, E = SocialError> = std::result::Result<T, E>;

impl SocialError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// HTTP status a host would map this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            SocialError::Validation(_) => 400,
            SocialError::NotFound(_) => 404,
            SocialError::Conflict(_) => 409,
            SocialError::Database(_) | SocialError::Internal(_) => 500,
        }
    }

    /// Only storage-level failures can succeed on a blind retry. Domain errors
    /// describe state that a retry would observe again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SocialError::Database(_))
    }
}

/// Name of the unique constraint `err` violated, if it is a unique violation.
pub fn violated_unique_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default())
        }
        _ => None,
    }
}

/// Translates a unique violation into `Conflict(message)`; everything else
/// stays a storage error.
pub fn unique_violation(err: sqlx::Error, message: impl Into<String>) -> SocialError {
    if violated_unique_constraint(&err).is_some() {
        SocialError::Conflict(message.into())
    } else {
        SocialError::Database(err)
    }
}

/// Rejects nil ids before any storage work happens.
pub fn require_id<T>(id: Id<T>, what: &str) -> Result<Id<T>> {
    if id.is_nil() {
        return Err(SocialError::validation(format!("{} is required", what)));
    }
    Ok(id)
}
