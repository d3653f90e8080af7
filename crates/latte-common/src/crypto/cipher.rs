//! Fernet cipher for the `extras` payload of account links
//!
//! Tokens are url-safe base64 text; the stored bytes are the token's ASCII.

use fernet::Fernet;
use latte_core::{DomainError, EncryptedExtras};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Encrypts and decrypts account-link payloads
#[derive(Clone)]
pub struct ExtrasCipher {
    fernet: Fernet,
}

impl ExtrasCipher {
    /// Create a cipher from a Fernet key (url-safe base64 of 32 bytes)
    ///
    /// # Errors
    /// Returns `DomainError::EncryptionError` if the key is malformed
    pub fn new(key: &str) -> Result<Self, DomainError> {
        let fernet = Fernet::new(key.trim())
            .ok_or_else(|| DomainError::EncryptionError("invalid fernet key".to_string()))?;
        Ok(Self { fernet })
    }

    /// Generate a fresh random key
    #[must_use]
    pub fn generate_key() -> String {
        Fernet::generate_key()
    }

    /// Encrypt raw bytes
    ///
    /// # Errors
    /// Returns `DomainError::ExtrasTooLarge` if the token exceeds the column bound
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedExtras, DomainError> {
        EncryptedExtras::new(self.fernet.encrypt(plaintext).into_bytes())
    }

    /// Decrypt a stored payload
    ///
    /// # Errors
    /// Returns `DomainError::EncryptionError` if the token is corrupt or was
    /// produced with another key
    pub fn decrypt(&self, extras: &EncryptedExtras) -> Result<Vec<u8>, DomainError> {
        let token = std::str::from_utf8(extras.as_bytes())
            .map_err(|_| DomainError::EncryptionError("token is not valid UTF-8".to_string()))?;
        self.fernet
            .decrypt(token)
            .map_err(|_| DomainError::EncryptionError("unable to decrypt payload".to_string()))
    }

    /// Serialize to JSON and encrypt
    pub fn encrypt_json<T: Serialize>(&self, value: &T) -> Result<EncryptedExtras, DomainError> {
        let json = serde_json::to_vec(value)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;
        self.encrypt(&json)
    }

    /// Decrypt and deserialize from JSON
    pub fn decrypt_json<T: DeserializeOwned>(
        &self,
        extras: &EncryptedExtras,
    ) -> Result<T, DomainError> {
        let plaintext = self.decrypt(extras)?;
        serde_json::from_slice(&plaintext)
            .map_err(|e| DomainError::SerializationError(e.to_string()))
    }
}

impl fmt::Debug for ExtrasCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExtrasCipher(<key redacted>)")
    }
}
