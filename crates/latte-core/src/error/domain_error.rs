//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("No account linked for user: {0}")]
    LinkNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid locale: {0:?}")]
    InvalidLocale(String),

    #[error("Locale too long: max {max} characters")]
    LocaleTooLong { max: usize },

    #[error("Encrypted payload too large: max {max} bytes")]
    ExtrasTooLarge { max: usize },

    #[error("Invalid account number: {0}")]
    InvalidAccountNumber(usize),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Riot account already linked")]
    AccountAlreadyLinked,

    #[error("Conflicting write: {0}")]
    Conflict(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Encryption error: {0}")]
    EncryptionError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Get a stable error code string for logs and reports
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::LinkNotFound(_) => "NO_ACCOUNTS_LINKED",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidLocale(_) => "INVALID_LOCALE",
            Self::LocaleTooLong { .. } => "LOCALE_TOO_LONG",
            Self::ExtrasTooLarge { .. } => "EXTRAS_TOO_LARGE",
            Self::InvalidAccountNumber(_) => "INVALID_ACCOUNT_NUMBER",

            // Conflict
            Self::AccountAlreadyLinked => "ACCOUNT_ALREADY_LINKED",
            Self::Conflict(_) => "CONFLICT",

            // Infrastructure
            Self::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::EncryptionError(_) => "ENCRYPTION_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LinkNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidLocale(_)
                | Self::LocaleTooLong { .. }
                | Self::ExtrasTooLarge { .. }
                | Self::InvalidAccountNumber(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AccountAlreadyLinked | Self::Conflict(_))
    }

    /// Check if the storage layer may succeed when the same call is retried
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
