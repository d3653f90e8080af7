//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every mutating method maps to a single
//! storage statement, so a cancelled call either fully applies or not at all.
//!
//! Read-modify-write edits of a link go through the `*_if` methods, which only
//! apply while the stored payload still equals the one that was read.

use async_trait::async_trait;

use crate::entities::{AccountLink, BlacklistEntry, CommandStat, CommandType, EncryptedExtras};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Account Link Repository
// ============================================================================

#[async_trait]
pub trait AccountLinkRepository: Send + Sync {
    /// Insert the link or replace the existing one for `link.user_id`
    async fn upsert(&self, link: &AccountLink) -> RepoResult<()>;

    /// Find the link for a user
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<AccountLink>>;

    /// List every link
    async fn find_all(&self) -> RepoResult<Vec<AccountLink>>;

    /// Insert a link only if the user has none; returns false when one exists
    async fn insert_new(&self, link: &AccountLink) -> RepoResult<bool>;

    /// Replace the link only while its payload still equals `expected`
    async fn replace_if(&self, link: &AccountLink, expected: &EncryptedExtras)
        -> RepoResult<bool>;

    /// Delete the link only while its payload still equals `expected`
    async fn delete_if(&self, user_id: Snowflake, expected: &EncryptedExtras)
        -> RepoResult<bool>;

    /// Delete a user's link; returns false when there was nothing to delete
    async fn delete(&self, user_id: Snowflake) -> RepoResult<bool>;

    /// Delete every link created in a guild, returning the affected users
    async fn delete_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Blacklist Repository
// ============================================================================

#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    /// Add an entry, replacing reason and date if the snowflake is already listed
    async fn add(&self, entry: &BlacklistEntry) -> RepoResult<()>;

    /// Point lookup used by the authorization gate
    async fn contains(&self, snowflake: Snowflake) -> RepoResult<bool>;

    /// Get a single entry
    async fn find(&self, snowflake: Snowflake) -> RepoResult<Option<BlacklistEntry>>;

    /// List all entries, newest first
    async fn find_all(&self) -> RepoResult<Vec<BlacklistEntry>>;

    /// Remove an entry; returns false when it was not listed
    async fn remove(&self, snowflake: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Command Stat Repository
// ============================================================================

#[async_trait]
pub trait CommandStatRepository: Send + Sync {
    /// Atomically increment the counter, creating it with `uses = 1`
    async fn record_use(&self, name: &str, command_type: CommandType) -> RepoResult<()>;

    /// Get a single counter
    async fn find(&self, name: &str, command_type: CommandType)
        -> RepoResult<Option<CommandStat>>;

    /// Snapshot of every counter
    async fn find_all(&self) -> RepoResult<Vec<CommandStat>>;
}
