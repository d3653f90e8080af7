//! Account link entity - binds a Discord user to their encrypted Riot session data

use chrono::{DateTime, SubsecRound, Utc};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::{Locale, Snowflake};

/// Upper bound on the stored ciphertext, in bytes
pub const MAX_EXTRAS_LEN: usize = 4096;

/// Opaque encrypted payload stored in the `extras` column
///
/// The domain never looks inside; encryption and decryption happen at the
/// cipher boundary in `latte-common`.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedExtras(Vec<u8>);

impl EncryptedExtras {
    /// Wrap ciphertext bytes, rejecting payloads over [`MAX_EXTRAS_LEN`]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, DomainError> {
        let bytes = bytes.into();
        if bytes.len() > MAX_EXTRAS_LEN {
            return Err(DomainError::ExtrasTooLarge {
                max: MAX_EXTRAS_LEN,
            });
        }
        Ok(Self(bytes))
    }

    /// Borrow the raw ciphertext
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the raw ciphertext
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EncryptedExtras {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedExtras(<{} bytes>)", self.0.len())
    }
}

/// A user's account link; at most one exists per `user_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLink {
    pub user_id: Snowflake,
    /// Guild the link was created in, `None` for DMs
    pub guild_id: Option<Snowflake>,
    pub extras: EncryptedExtras,
    pub date_signed: DateTime<Utc>,
    pub locale: Locale,
}

impl AccountLink {
    /// Create a new link signed now
    pub fn new(
        user_id: Snowflake,
        guild_id: Option<Snowflake>,
        extras: EncryptedExtras,
        locale: Locale,
    ) -> Self {
        Self {
            user_id,
            guild_id,
            extras,
            // TIMESTAMP columns keep microseconds
            date_signed: Utc::now().trunc_subsecs(6),
            locale,
        }
    }

    /// Replace the payload after a re-authentication
    pub fn resign(&mut self, extras: EncryptedExtras) {
        self.extras = extras;
        self.date_signed = Utc::now().trunc_subsecs(6);
    }
}
