//! # latte-core
//!
//! Domain layer for the latte bot: account links, blacklist entries, command
//! usage stats, the errors they raise and the repository traits that persist them.
//! This crate has zero dependencies on infrastructure (database, chat gateway, crypto).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AccountLink, BlacklistEntry, CommandStat, CommandType, EncryptedExtras, LinkedAccounts,
    RiotAccount, MAX_EXTRAS_LEN,
};
pub use error::DomainError;
pub use traits::{AccountLinkRepository, BlacklistRepository, CommandStatRepository, RepoResult};
pub use value_objects::{Locale, Snowflake, SnowflakeParseError};
