//! Locale - a user's display-locale preference (e.g. `en-US`, `th`)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Display locale as reported by the chat platform
///
/// Bounded to [`Locale::MAX_LEN`] characters to match the `VARCHAR(100)` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Maximum length in characters
    pub const MAX_LEN: usize = 100;

    /// Validate and wrap a locale string
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidLocale(value));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(DomainError::LocaleTooLong { max: Self::MAX_LEN });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidLocale(value));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get the locale as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en-US".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Locale {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Locale {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}
