//! Encryption boundary for account-link payloads

mod cipher;

pub use cipher::ExtrasCipher;
