pub mod alert_service;
pub mod audit;
pub mod booking_service;
pub mod cms_service;
pub mod cobranding_service;
pub mod flag_service;
pub mod layout_cache;
pub mod match_service;
pub mod profile_service;
pub mod site_service;
pub mod verification_service;

use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Unified service-layer failure taxonomy. Handlers map these onto
/// HTTP status codes in one place.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Maps a unique-constraint violation onto `Conflict` with the given
/// message; every other database error passes through unchanged.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> ServiceError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            ServiceError::Conflict(message.to_string())
        }
        other => ServiceError::Sqlx(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct FakeDbError {
        message: String,
        kind: ErrorKind,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            &self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                ErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
                ErrorKind::CheckViolation => ErrorKind::CheckViolation,
                _ => ErrorKind::Other,
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn db_error(kind: ErrorKind) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError {
            message: "duplicate key value violates unique constraint".to_string(),
            kind,
        }))
    }

    #[test]
    fn unique_violation_becomes_conflict_with_the_given_message() {
        let err = conflict_on_unique(db_error(ErrorKind::UniqueViolation), "Already exists");
        match err {
            ServiceError::Conflict(msg) => assert_eq!(msg, "Already exists"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = conflict_on_unique(db_error(ErrorKind::ForeignKeyViolation), "Already exists");
        assert!(matches!(err, ServiceError::Sqlx(sqlx::Error::Database(_))));
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = conflict_on_unique(sqlx::Error::RowNotFound, "Already exists");
        assert!(matches!(err, ServiceError::Sqlx(sqlx::Error::RowNotFound)));
    }
}
