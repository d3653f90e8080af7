//! In-memory repository doubles for service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use latte_common::{BotConfig, ExtrasCipher, RetryConfig};
use latte_core::traits::{
    AccountLinkRepository, BlacklistRepository, CommandStatRepository, RepoResult,
};
use latte_core::{
    AccountLink, BlacklistEntry, CommandStat, CommandType, DomainError, EncryptedExtras, Snowflake,
};

use super::context::{StoreContext, StoreContextBuilder};

/// Makes the next `n` calls fail with `StorageUnavailable`
#[derive(Debug, Default)]
pub(crate) struct Outage(AtomicUsize);

impl Outage {
    fn check(&self) -> RepoResult<()> {
        let tripped = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            Err(DomainError::StorageUnavailable("injected outage".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Hands control back to the runtime when switched on, so joined futures
/// interleave inside a repository call
#[derive(Debug, Default)]
pub(crate) struct Interleave(AtomicBool);

impl Interleave {
    async fn point(&self) {
        if self.0.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct InMemoryLinks {
    rows: RwLock<HashMap<Snowflake, AccountLink>>,
    interleave: Interleave,
    outage: Outage,
}

impl InMemoryLinks {
    pub(crate) fn interleave_reads(&self) {
        self.interleave.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub(crate) fn fail_next(&self, n: usize) {
        self.outage.0.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountLinkRepository for InMemoryLinks {
    async fn upsert(&self, link: &AccountLink) -> RepoResult<()> {
        self.outage.check()?;
        self.rows.write().insert(link.user_id, link.clone());
        Ok(())
    }

    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<AccountLink>> {
        self.outage.check()?;
        let found = self.rows.read().get(&user_id).cloned();
        self.interleave.point().await;
        Ok(found)
    }

    async fn find_all(&self) -> RepoResult<Vec<AccountLink>> {
        self.outage.check()?;
        Ok(self.rows.read().values().cloned().collect())
    }

    async fn insert_new(&self, link: &AccountLink) -> RepoResult<bool> {
        self.outage.check()?;
        let mut rows = self.rows.write();
        if rows.contains_key(&link.user_id) {
            return Ok(false);
        }
        rows.insert(link.user_id, link.clone());
        Ok(true)
    }

    async fn replace_if(&self, link: &AccountLink, expected: &EncryptedExtras) -> RepoResult<bool> {
        self.outage.check()?;
        Ok(match self.rows.write().get_mut(&link.user_id) {
            Some(current) if current.extras == *expected => {
                *current = link.clone();
                true
            }
            _ => false,
        })
    }

    async fn delete_if(&self, user_id: Snowflake, expected: &EncryptedExtras) -> RepoResult<bool> {
        self.outage.check()?;
        let mut rows = self.rows.write();
        if rows.get(&user_id).is_some_and(|current| current.extras == *expected) {
            rows.remove(&user_id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete(&self, user_id: Snowflake) -> RepoResult<bool> {
        self.outage.check()?;
        Ok(self.rows.write().remove(&user_id).is_some())
    }

    async fn delete_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        self.outage.check()?;
        let mut rows = self.rows.write();
        let removed: Vec<Snowflake> = rows
            .values()
            .filter(|link| link.guild_id == Some(guild_id))
            .map(|link| link.user_id)
            .collect();
        for user_id in &removed {
            rows.remove(user_id);
        }
        Ok(removed)
    }
}

#[derive(Debug, Default)]
pub(crate) struct InMemoryBlacklist {
    rows: RwLock<HashMap<Snowflake, BlacklistEntry>>,
    contains_calls: AtomicUsize,
    interleave: Interleave,
    outage: Outage,
}

impl InMemoryBlacklist {
    pub(crate) fn interleave_reads(&self) {
        self.interleave.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn contains_calls(&self) -> usize {
        self.contains_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_next(&self, n: usize) {
        self.outage.0.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlacklistRepository for InMemoryBlacklist {
    async fn add(&self, entry: &BlacklistEntry) -> RepoResult<()> {
        self.outage.check()?;
        self.rows.write().insert(entry.snowflake, entry.clone());
        Ok(())
    }

    async fn contains(&self, snowflake: Snowflake) -> RepoResult<bool> {
        self.contains_calls.fetch_add(1, Ordering::SeqCst);
        self.outage.check()?;
        let listed = self.rows.read().contains_key(&snowflake);
        self.interleave.point().await;
        Ok(listed)
    }

    async fn find(&self, snowflake: Snowflake) -> RepoResult<Option<BlacklistEntry>> {
        self.outage.check()?;
        Ok(self.rows.read().get(&snowflake).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<BlacklistEntry>> {
        self.outage.check()?;
        let mut entries: Vec<_> = self.rows.read().values().cloned().collect();
        self.interleave.point().await;
        entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(entries)
    }

    async fn remove(&self, snowflake: Snowflake) -> RepoResult<bool> {
        self.outage.check()?;
        Ok(self.rows.write().remove(&snowflake).is_some())
    }
}

/// Counter table guarded by one lock, so an increment is a single critical section
#[derive(Debug, Default)]
pub(crate) struct InMemoryStats {
    rows: Mutex<HashMap<(String, CommandType), u64>>,
    interleave: Interleave,
    outage: Outage,
}

impl InMemoryStats {
    pub(crate) fn interleave_writes(&self) {
        self.interleave.0.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_next(&self, n: usize) {
        self.outage.0.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl CommandStatRepository for InMemoryStats {
    async fn record_use(&self, name: &str, command_type: CommandType) -> RepoResult<()> {
        CommandStat::validate_name(name)?;
        self.outage.check()?;
        self.interleave.point().await;
        *self
            .rows
            .lock()
            .entry((name.to_string(), command_type))
            .or_insert(0) += 1;
        Ok(())
    }

    async fn find(&self, name: &str, command_type: CommandType) -> RepoResult<Option<CommandStat>> {
        self.outage.check()?;
        Ok(self
            .rows
            .lock()
            .get(&(name.to_string(), command_type))
            .map(|&uses| CommandStat {
                name: name.to_string(),
                command_type,
                uses,
            }))
    }

    async fn find_all(&self) -> RepoResult<Vec<CommandStat>> {
        self.outage.check()?;
        let mut stats: Vec<_> = self
            .rows
            .lock()
            .iter()
            .map(|((name, command_type), &uses)| CommandStat {
                name: name.clone(),
                command_type: *command_type,
                uses,
            })
            .collect();
        stats.sort_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.name.cmp(&b.name)));
        Ok(stats)
    }
}

/// One set of doubles plus the context wired over them
pub(crate) struct TestStores {
    pub(crate) links: Arc<InMemoryLinks>,
    pub(crate) blacklist: Arc<InMemoryBlacklist>,
    pub(crate) stats: Arc<InMemoryStats>,
    pub(crate) cipher: ExtrasCipher,
}

impl TestStores {
    pub(crate) fn new() -> Self {
        Self {
            links: Arc::default(),
            blacklist: Arc::default(),
            stats: Arc::default(),
            cipher: ExtrasCipher::new(&ExtrasCipher::generate_key()).expect("generated key is valid"),
        }
    }

    pub(crate) fn context(&self) -> StoreContext {
        self.context_with(BotConfig::default())
    }

    pub(crate) fn context_with(&self, bot: BotConfig) -> StoreContext {
        StoreContextBuilder::new()
            .link_repo(self.links.clone())
            .blacklist_repo(self.blacklist.clone())
            .stat_repo(self.stats.clone())
            .cipher(self.cipher.clone())
            .retry_config(RetryConfig {
                min_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
                max_times: 2,
            })
            .bot_config(bot)
            .build()
            .expect("all dependencies provided")
    }
}
