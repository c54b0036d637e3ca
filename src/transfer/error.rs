//! Transfer error taxonomy and storage-error classification

use thiserror::Error;

/// Errors surfaced by the transfer engine and read services.
///
/// Only `Transient` is recovered locally (bounded retry); every other
/// kind aborts the transactional scope and propagates to the caller.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Transient storage conflict: {0}")]
    Transient(sqlx::Error),

    #[error("Statement timed out: {0}")]
    Timeout(sqlx::Error),

    #[error("Storage error: {0}")]
    Internal(sqlx::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl TransferError {
    /// Serialization failures and deadlocks are safe to retry after the
    /// scope rolled back; nothing else is.
    pub fn is_transient(&self) -> bool {
        matches!(self, TransferError::Transient(_))
    }
}

// PostgreSQL SQLSTATE codes classified at the storage boundary
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const QUERY_CANCELED: &str = "57014";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

impl From<sqlx::Error> for TransferError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let code = db.code().map(|c| c.into_owned());
            match code.as_deref() {
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                    return TransferError::Transient(err);
                }
                // statement_timeout surfaces as a cancelled query
                Some(QUERY_CANCELED) => return TransferError::Timeout(err),
                Some(UNIQUE_VIOLATION) => {
                    return TransferError::Conflict(format!(
                        "Uniqueness violation: {}",
                        db.message()
                    ));
                }
                Some(FOREIGN_KEY_VIOLATION) | Some(CHECK_VIOLATION) => {
                    return TransferError::BadRequest(format!(
                        "Constraint violation: {}",
                        db.message()
                    ));
                }
                _ => return TransferError::Internal(err),
            }
        }

        if matches!(err, sqlx::Error::PoolTimedOut) {
            return TransferError::Timeout(err);
        }

        TransferError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_classifies_as_timeout() {
        let err = TransferError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, TransferError::Timeout(_)));
    }

    #[test]
    fn test_unclassified_errors_are_internal() {
        let err = TransferError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, TransferError::Internal(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(!TransferError::BadRequest("x".into()).is_transient());
        assert!(!TransferError::Conflict("x".into()).is_transient());
        assert!(!TransferError::Unprocessable("x".into()).is_transient());
        assert!(TransferError::Transient(sqlx::Error::PoolClosed).is_transient());
    }
}
