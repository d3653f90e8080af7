//! Error handling utilities for repositories

use latte_core::DomainError;
use sqlx::Error as SqlxError;

/// SQLSTATE codes that mean "try again": connection exceptions (class 08),
/// admin/crash shutdown, serialization failure and deadlock.
const TRANSIENT_SQLSTATES: &[&str] = &["57P01", "57P02", "57P03", "40001", "40P01"];

/// Convert SQLx error to DomainError
///
/// Connectivity failures become `StorageUnavailable` so callers can back off
/// and retry; unique violations become `Conflict`.
pub fn map_db_error(e: SqlxError) -> DomainError {
    match &e {
        SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed
        | SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::Protocol(_) => DomainError::StorageUnavailable(e.to_string()),
        SqlxError::Database(db_err) => {
            if db_err.is_unique_violation() {
                return DomainError::Conflict(db_err.message().to_string());
            }
            match db_err.code() {
                Some(code) if code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&&*code) => {
                    DomainError::StorageUnavailable(e.to_string())
                }
                _ => DomainError::DatabaseError(e.to_string()),
            }
        }
        _ => DomainError::DatabaseError(e.to_string()),
    }
}
