//! Repository error type and database error classification.

use sea_orm::{DbErr, RuntimeErr};

use daftar_core::ledger::{ErrorKind, LedgerError};
use daftar_shared::error::AppError;

/// `PostgreSQL` SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// `PostgreSQL` SQLSTATE for an exclusion constraint violation.
const EXCLUSION_VIOLATION: &str = "23P01";
/// `PostgreSQL` SQLSTATE for a serialization failure.
const SERIALIZATION_FAILURE: &str = "40001";
/// `PostgreSQL` SQLSTATE for a detected deadlock.
const DEADLOCK_DETECTED: &str = "40P01";

/// Errors returned by the ledger repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A ledger rule was violated or a record is missing.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::Database(_) => ErrorKind::Persistence,
        }
    }

    /// Returns true if the operation may succeed when retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Concurrency
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Ledger(e) => e.into(),
            RepositoryError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                Self::Internal("An internal error occurred".to_string())
            }
        }
    }
}

/// The database-level details of a failed statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DbFailure {
    pub code: Option<String>,
    pub constraint: Option<String>,
}

impl DbFailure {
    pub(crate) fn of(err: &DbErr) -> Self {
        match err {
            DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
            | DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => Self {
                code: e.code().map(std::borrow::Cow::into_owned),
                constraint: e.constraint().map(str::to_string),
            },
            _ => Self::default(),
        }
    }

    pub(crate) fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }

    pub(crate) fn is_exclusion_violation(&self) -> bool {
        self.code.as_deref() == Some(EXCLUSION_VIOLATION)
    }

    pub(crate) fn is_concurrency_failure(&self) -> bool {
        matches!(
            self.code.as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        )
    }

    pub(crate) fn constraint_is(&self, name: &str) -> bool {
        self.constraint.as_deref() == Some(name)
    }
}

/// Maps transient lock failures to `ConcurrentModification`.
pub(crate) fn classify(err: DbErr) -> RepositoryError {
    if DbFailure::of(&err).is_concurrency_failure() {
        RepositoryError::Ledger(LedgerError::ConcurrentModification)
    } else {
        RepositoryError::Database(err)
    }
}
