//! Blacklist service
//!
//! Every command passes through [`BlacklistService::check_request`], so lookups
//! are served from an in-memory set kept write-through with the `blacklist`
//! table. Before [`BlacklistService::warm_cache`] has run, a miss falls back to
//! the repository.
//!
//! Anything that writes the table or fills the cache from it holds the cache's
//! write lock for the whole step, so a lookup that read the table before a
//! remove cannot put the removed snowflake back. Hits, and misses once warm,
//! never take the lock.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashSet;
use latte_core::{BlacklistEntry, Snowflake};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use super::context::StoreContext;
use super::error::{ServiceError, ServiceResult};
use super::retry::with_retry;

/// Snowflakes known to be blacklisted
#[derive(Debug, Default)]
pub struct BlacklistCache {
    entries: DashSet<Snowflake>,
    warmed: AtomicBool,
    writes: Mutex<()>,
}

impl BlacklistCache {
    pub fn contains(&self, snowflake: Snowflake) -> bool {
        self.entries.contains(&snowflake)
    }

    pub fn insert(&self, snowflake: Snowflake) {
        self.entries.insert(snowflake);
    }

    pub fn remove(&self, snowflake: Snowflake) {
        self.entries.remove(&snowflake);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the set mirrors the whole table, making a miss authoritative
    pub fn is_warm(&self) -> bool {
        self.warmed.load(Ordering::Acquire)
    }

    async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    fn replace_all(&self, snowflakes: impl IntoIterator<Item = Snowflake>) {
        self.entries.clear();
        for snowflake in snowflakes {
            self.entries.insert(snowflake);
        }
        self.warmed.store(true, Ordering::Release);
    }
}

/// Blacklist service
pub struct BlacklistService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> BlacklistService<'a> {
    /// Create a new BlacklistService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Blacklist a user or guild
    ///
    /// Returns `false` if the snowflake was already listed; the reason is
    /// replaced either way.
    #[instrument(skip(self, reason))]
    pub async fn add(&self, snowflake: Snowflake, reason: Option<String>) -> ServiceResult<bool> {
        let repo = self.ctx.blacklist_repo();
        let retry = self.ctx.retry_config();
        let entry = BlacklistEntry::new(snowflake, reason);
        let entry = &entry;
        let cache = self.ctx.blacklist_cache();
        let _writes = cache.lock_writes().await;

        let already = with_retry(retry, "blacklist.contains", || repo.contains(snowflake)).await?;
        with_retry(retry, "blacklist.add", || repo.add(entry)).await?;
        cache.insert(snowflake);

        info!(snowflake = %snowflake, already, "Blacklist entry added");
        Ok(!already)
    }

    /// Lift a blacklist entry; `false` if there was none
    #[instrument(skip(self))]
    pub async fn remove(&self, snowflake: Snowflake) -> ServiceResult<bool> {
        let repo = self.ctx.blacklist_repo();
        let cache = self.ctx.blacklist_cache();
        let _writes = cache.lock_writes().await;

        let removed =
            with_retry(self.ctx.retry_config(), "blacklist.remove", || repo.remove(snowflake))
                .await?;
        cache.remove(snowflake);

        if removed {
            info!(snowflake = %snowflake, "Blacklist entry removed");
        }
        Ok(removed)
    }

    /// Point lookup, served from the cache when possible
    #[instrument(skip(self))]
    pub async fn is_blacklisted(&self, snowflake: Snowflake) -> ServiceResult<bool> {
        let cache = self.ctx.blacklist_cache();
        if cache.contains(snowflake) {
            return Ok(true);
        }
        if cache.is_warm() {
            return Ok(false);
        }

        let _writes = cache.lock_writes().await;
        if cache.contains(snowflake) {
            return Ok(true);
        }
        if cache.is_warm() {
            return Ok(false);
        }

        let repo = self.ctx.blacklist_repo();
        let listed =
            with_retry(self.ctx.retry_config(), "blacklist.contains", || repo.contains(snowflake))
                .await?;
        if listed {
            cache.insert(snowflake);
        }
        Ok(listed)
    }

    /// Reject a request whose user or guild is blacklisted
    ///
    /// # Errors
    /// Returns `ServiceError::Blacklisted` naming the listed snowflake
    pub async fn check_request(
        &self,
        user_id: Snowflake,
        guild_id: Option<Snowflake>,
    ) -> ServiceResult<()> {
        if self.is_blacklisted(user_id).await? {
            debug!(user_id = %user_id, "Request from blacklisted user rejected");
            return Err(ServiceError::Blacklisted(user_id));
        }
        if let Some(guild_id) = guild_id {
            if self.is_blacklisted(guild_id).await? {
                debug!(guild_id = %guild_id, "Request from blacklisted guild rejected");
                return Err(ServiceError::Blacklisted(guild_id));
            }
        }
        Ok(())
    }

    /// Whether the bot should leave a guild it was just added to
    pub async fn should_leave_guild(&self, guild_id: Snowflake) -> ServiceResult<bool> {
        self.is_blacklisted(guild_id).await
    }

    /// All entries, newest first
    #[instrument(skip(self))]
    pub async fn entries(&self) -> ServiceResult<Vec<BlacklistEntry>> {
        let repo = self.ctx.blacklist_repo();
        Ok(with_retry(self.ctx.retry_config(), "blacklist.find_all", || repo.find_all()).await?)
    }

    /// Load the whole table into the cache
    #[instrument(skip(self))]
    pub async fn warm_cache(&self) -> ServiceResult<usize> {
        let cache = self.ctx.blacklist_cache();
        let _writes = cache.lock_writes().await;

        let entries = self.entries().await?;
        let count = entries.len();
        cache.replace_all(entries.into_iter().map(|e| e.snowflake));

        info!(count, "Blacklist cache warmed");
        Ok(count)
    }
}
