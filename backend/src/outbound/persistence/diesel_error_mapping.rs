//! Diesel and pool error mapping for the student repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::StudentRepositoryError;

use super::pool::PoolError;

/// Map pool failures onto connection errors.
pub(super) fn map_pool_error(error: PoolError) -> StudentRepositoryError {
    StudentRepositoryError::connection(error.into_message())
}

/// Map Diesel failures onto repository errors.
///
/// Constraint violations are kept apart from generic query failures so
/// callers can report rejected writes; driver messages are logged at debug
/// level and not propagated.
pub(super) fn map_diesel_error(error: DieselError) -> StudentRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StudentRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => StudentRepositoryError::query("database query error"),
        DieselError::DatabaseError(kind, _) => match kind {
            DatabaseErrorKind::ClosedConnection => {
                StudentRepositoryError::connection("database connection error")
            }
            DatabaseErrorKind::UniqueViolation => {
                StudentRepositoryError::constraint("unique constraint violated")
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                StudentRepositoryError::constraint("foreign key constraint violated")
            }
            DatabaseErrorKind::NotNullViolation => {
                StudentRepositoryError::constraint("required column missing")
            }
            DatabaseErrorKind::CheckViolation => {
                StudentRepositoryError::constraint("check constraint violated")
            }
            _ => StudentRepositoryError::query("database error"),
        },
        _ => StudentRepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, StudentRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        let mapped = map_diesel_error(DieselError::NotFound);
        assert_eq!(mapped, StudentRepositoryError::query("record not found"));
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation)]
    #[case(DatabaseErrorKind::ForeignKeyViolation)]
    #[case(DatabaseErrorKind::NotNullViolation)]
    #[case(DatabaseErrorKind::CheckViolation)]
    fn constraint_violations_are_reported_as_such(#[case] kind: DatabaseErrorKind) {
        let error = DieselError::DatabaseError(kind, Box::new("violation".to_owned()));
        assert!(matches!(
            map_diesel_error(error),
            StudentRepositoryError::Constraint { .. }
        ));
    }

    #[rstest]
    fn closed_connections_are_connection_errors() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert!(matches!(
            map_diesel_error(error),
            StudentRepositoryError::Connection { .. }
        ));
    }
}
