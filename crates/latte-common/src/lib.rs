//! # latte-common
//!
//! Shared utilities including configuration, error handling, the encryption
//! boundary for account-link payloads, retry policy and telemetry.

pub mod config;
pub mod crypto;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, BotConfig, ConfigError, DatabaseConfig, EncryptionConfig,
    Environment, RetryConfig,
};
pub use crypto::ExtrasCipher;
pub use error::{AppError, AppResult};
pub use telemetry::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
