//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use latte_common::AppError;
use latte_core::{DomainError, Snowflake};
use std::fmt;
use std::time::Duration;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or storage failure
    Domain(DomainError),

    /// Application error (config, encryption, etc.)
    App(AppError),

    /// The user or guild is on the blacklist
    Blacklisted(Snowflake),

    /// A command handler ran past its deadline
    Timeout(Duration),

    /// Validation error
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Blacklisted(id) => write!(f, "Blacklisted: {id}"),
            Self::Timeout(after) => write!(f, "Command timed out after {}s", after.as_secs()),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the storage was unreachable after bounded retries
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_transient(),
            Self::App(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Get the error code for logs and replies
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Blacklisted(_) => "BLACKLISTED",
            Self::Timeout(_) => "TIMEOUT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Text safe to show the invoking user
    ///
    /// Storage and internal failures never leak their details.
    pub fn user_message(&self) -> String {
        if self.is_transient() {
            return "The bot is having trouble reaching its storage. Please try again later."
                .to_string();
        }
        match self {
            Self::Domain(e) if e.is_not_found() => {
                "You don't have any account linked. Use `/login` first.".to_string()
            }
            Self::Domain(e) if e.is_validation() || e.is_conflict() => e.to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::Blacklisted(_) => "You are not allowed to use this bot.".to_string(),
            Self::Timeout(_) => "The command took too long. Please try again.".to_string(),
            _ => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) => AppError::Domain(DomainError::ValidationError(msg)),
            other => AppError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
