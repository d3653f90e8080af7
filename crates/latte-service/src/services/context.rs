//! Store context - dependency container for services
//!
//! Holds the repositories, the payload cipher and the settings services need.
//! Cloning is cheap; every clone shares the same repositories and blacklist cache.

use std::sync::Arc;

use latte_common::{AppConfig, BotConfig, ExtrasCipher, RetryConfig};
use latte_core::traits::{AccountLinkRepository, BlacklistRepository, CommandStatRepository};
use latte_db::{PgAccountLinkRepository, PgBlacklistRepository, PgCommandStatRepository, PgPool};

use super::blacklist::BlacklistCache;
use super::error::{ServiceError, ServiceResult};

/// Store context containing all dependencies
#[derive(Clone)]
pub struct StoreContext {
    // Repositories
    link_repo: Arc<dyn AccountLinkRepository>,
    blacklist_repo: Arc<dyn BlacklistRepository>,
    stat_repo: Arc<dyn CommandStatRepository>,

    cipher: ExtrasCipher,
    blacklist_cache: Arc<BlacklistCache>,

    // Settings
    retry: RetryConfig,
    bot: BotConfig,
}

impl StoreContext {
    /// Create a new store context with all dependencies
    pub fn new(
        link_repo: Arc<dyn AccountLinkRepository>,
        blacklist_repo: Arc<dyn BlacklistRepository>,
        stat_repo: Arc<dyn CommandStatRepository>,
        cipher: ExtrasCipher,
        retry: RetryConfig,
        bot: BotConfig,
    ) -> Self {
        Self {
            link_repo,
            blacklist_repo,
            stat_repo,
            cipher,
            blacklist_cache: Arc::new(BlacklistCache::default()),
            retry,
            bot,
        }
    }

    /// Wire the PostgreSQL repositories over one pool
    ///
    /// # Errors
    /// Returns `ServiceError::Domain` if the encryption key is malformed
    pub fn from_pool(pool: PgPool, config: &AppConfig) -> ServiceResult<Self> {
        let cipher = ExtrasCipher::new(&config.encryption.key)?;

        Ok(Self::new(
            Arc::new(PgAccountLinkRepository::new(pool.clone())),
            Arc::new(PgBlacklistRepository::new(pool.clone())),
            Arc::new(PgCommandStatRepository::new(pool)),
            cipher,
            config.retry,
            config.bot.clone(),
        ))
    }

    // === Repositories ===

    /// Get the account link repository
    pub fn link_repo(&self) -> &dyn AccountLinkRepository {
        self.link_repo.as_ref()
    }

    /// Get the blacklist repository
    pub fn blacklist_repo(&self) -> &dyn BlacklistRepository {
        self.blacklist_repo.as_ref()
    }

    /// Get the command stat repository
    pub fn stat_repo(&self) -> &dyn CommandStatRepository {
        self.stat_repo.as_ref()
    }

    // === Shared state ===

    pub fn cipher(&self) -> &ExtrasCipher {
        &self.cipher
    }

    pub fn blacklist_cache(&self) -> &BlacklistCache {
        self.blacklist_cache.as_ref()
    }

    // === Settings ===

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn bot_config(&self) -> &BotConfig {
        &self.bot
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("repositories", &"...")
            .field("cipher", &self.cipher)
            .field("blacklist_cache", &self.blacklist_cache.len())
            .field("retry", &self.retry)
            .field("bot", &self.bot)
            .finish()
    }
}

/// Builder for creating StoreContext with custom configuration
#[derive(Default)]
pub struct StoreContextBuilder {
    link_repo: Option<Arc<dyn AccountLinkRepository>>,
    blacklist_repo: Option<Arc<dyn BlacklistRepository>>,
    stat_repo: Option<Arc<dyn CommandStatRepository>>,
    cipher: Option<ExtrasCipher>,
    retry: Option<RetryConfig>,
    bot: Option<BotConfig>,
}

impl StoreContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_repo(mut self, repo: Arc<dyn AccountLinkRepository>) -> Self {
        self.link_repo = Some(repo);
        self
    }

    pub fn blacklist_repo(mut self, repo: Arc<dyn BlacklistRepository>) -> Self {
        self.blacklist_repo = Some(repo);
        self
    }

    pub fn stat_repo(mut self, repo: Arc<dyn CommandStatRepository>) -> Self {
        self.stat_repo = Some(repo);
        self
    }

    pub fn cipher(mut self, cipher: ExtrasCipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn bot_config(mut self, bot: BotConfig) -> Self {
        self.bot = Some(bot);
        self
    }

    /// Build the StoreContext
    ///
    /// Retry and bot settings fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a repository or the cipher is missing
    pub fn build(self) -> ServiceResult<StoreContext> {
        Ok(StoreContext::new(
            self.link_repo
                .ok_or_else(|| ServiceError::validation("link_repo is required"))?,
            self.blacklist_repo
                .ok_or_else(|| ServiceError::validation("blacklist_repo is required"))?,
            self.stat_repo
                .ok_or_else(|| ServiceError::validation("stat_repo is required"))?,
            self.cipher
                .ok_or_else(|| ServiceError::validation("cipher is required"))?,
            self.retry.unwrap_or_default(),
            self.bot.unwrap_or_default(),
        ))
    }
}
