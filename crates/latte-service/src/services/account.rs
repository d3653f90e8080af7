//! Account service
//!
//! Links Discord users to their Riot accounts. The account list is only ever
//! stored encrypted; this service is where it is decrypted and re-encrypted.

use chrono::{DateTime, SubsecRound, Utc};
use latte_core::{
    AccountLink, DomainError, EncryptedExtras, LinkedAccounts, Locale, RiotAccount, Snowflake,
};
use tracing::{debug, info, instrument, warn};

use super::blacklist::BlacklistService;
use super::context::StoreContext;
use super::error::{ServiceError, ServiceResult};
use super::retry::with_retry;

/// Read-modify-write attempts before a contended edit gives up with `Conflict`
const MAX_EDIT_ATTEMPTS: usize = 5;

/// Account service
pub struct AccountService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> AccountService<'a> {
    /// Create a new AccountService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Add a Riot account to a user's link, creating the link if needed
    ///
    /// The link is re-signed and takes the guild and locale of this request.
    #[instrument(skip(self, account), fields(riot_id = %account.riot_id()))]
    pub async fn link_account(
        &self,
        user_id: Snowflake,
        guild_id: Option<Snowflake>,
        locale: &str,
        account: RiotAccount,
    ) -> ServiceResult<AccountLink> {
        let locale = Locale::new(locale)?;

        for attempt in 1..=MAX_EDIT_ATTEMPTS {
            let current = self.find_link(user_id).await?;
            let mut accounts = match &current {
                Some(link) => self.decrypt_accounts(link)?,
                None => LinkedAccounts::new(),
            };
            let acc_num = accounts.add(account.clone())?.acc_num;

            let extras = self.ctx.cipher().encrypt_json(&accounts)?;
            let link = AccountLink::new(user_id, guild_id, extras, locale.clone());
            if self.swap(current.as_ref(), Some(&link)).await? {
                info!(user_id = %user_id, acc_num, total = accounts.len(), "Riot account linked");
                return Ok(link);
            }
            debug!(user_id = %user_id, attempt, "Link changed while linking, re-reading");
        }

        Err(contended(user_id))
    }

    /// Create or replace a user's link with an already encrypted payload
    #[instrument(skip(self, extras))]
    pub async fn upsert_link(
        &self,
        user_id: Snowflake,
        guild_id: Option<Snowflake>,
        extras: EncryptedExtras,
        signed_at: DateTime<Utc>,
        locale: &str,
    ) -> ServiceResult<AccountLink> {
        let link = AccountLink {
            user_id,
            guild_id,
            extras,
            date_signed: signed_at.trunc_subsecs(6),
            locale: Locale::new(locale)?,
        };
        self.store(&link).await?;
        Ok(link)
    }

    /// Fetch a user's link
    ///
    /// # Errors
    /// Returns `DomainError::LinkNotFound` if the user never linked
    #[instrument(skip(self))]
    pub async fn get_link(&self, user_id: Snowflake) -> ServiceResult<AccountLink> {
        Ok(self
            .find_link(user_id)
            .await?
            .ok_or(DomainError::LinkNotFound(user_id))?)
    }

    /// Decrypted list of a user's Riot accounts
    #[instrument(skip(self))]
    pub async fn linked_accounts(&self, user_id: Snowflake) -> ServiceResult<LinkedAccounts> {
        let link = self.get_link(user_id).await?;
        Ok(self.decrypt_accounts(&link)?)
    }

    /// Remove one Riot account by its 1-based number
    ///
    /// Removing the last account deletes the whole link.
    #[instrument(skip(self))]
    pub async fn unlink_account(
        &self,
        user_id: Snowflake,
        number: usize,
    ) -> ServiceResult<RiotAccount> {
        for attempt in 1..=MAX_EDIT_ATTEMPTS {
            let current = self.get_link(user_id).await?;
            let mut accounts = self.decrypt_accounts(&current)?;
            let removed = accounts.remove(number)?;

            let next = if accounts.is_empty() {
                None
            } else {
                Some(AccountLink {
                    extras: self.ctx.cipher().encrypt_json(&accounts)?,
                    ..current.clone()
                })
            };
            if self.swap(Some(&current), next.as_ref()).await? {
                info!(user_id = %user_id, number, remaining = accounts.len(), "Riot account unlinked");
                return Ok(removed);
            }
            debug!(user_id = %user_id, attempt, "Link changed while unlinking, re-reading");
        }

        Err(contended(user_id))
    }

    /// Delete a user's link; `false` if there was none
    #[instrument(skip(self))]
    pub async fn delete_link(&self, user_id: Snowflake) -> ServiceResult<bool> {
        let repo = self.ctx.link_repo();
        let deleted =
            with_retry(self.ctx.retry_config(), "link.delete", || repo.delete(user_id)).await?;

        if deleted {
            info!(user_id = %user_id, "Account link deleted");
        }
        Ok(deleted)
    }

    /// Forget every linked account at once
    pub async fn unlink_all(&self, user_id: Snowflake) -> ServiceResult<bool> {
        self.delete_link(user_id).await
    }

    /// Drop the links created in a guild the bot has left
    #[instrument(skip(self))]
    pub async fn forget_guild(&self, guild_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        let repo = self.ctx.link_repo();
        let removed = with_retry(self.ctx.retry_config(), "link.delete_by_guild", || {
            repo.delete_by_guild(guild_id)
        })
        .await?;

        info!(guild_id = %guild_id, count = removed.len(), "Guild links removed");
        Ok(removed)
    }

    /// Delete the links of every blacklisted snowflake
    #[instrument(skip(self, blacklist))]
    pub async fn purge_blacklisted(&self, blacklist: &BlacklistService<'_>) -> ServiceResult<usize> {
        let mut purged = 0;
        for entry in blacklist.entries().await? {
            if self.delete_link(entry.snowflake).await? {
                purged += 1;
            }
        }

        if purged > 0 {
            warn!(purged, "Removed links of blacklisted users");
        }
        Ok(purged)
    }

    async fn find_link(&self, user_id: Snowflake) -> ServiceResult<Option<AccountLink>> {
        let repo = self.ctx.link_repo();
        Ok(with_retry(self.ctx.retry_config(), "link.find", || repo.find(user_id)).await?)
    }

    /// Upsert with bounded retry; a unique violation from a racing insert is retried once
    async fn store(&self, link: &AccountLink) -> ServiceResult<()> {
        let repo = self.ctx.link_repo();
        let retry = self.ctx.retry_config();

        match with_retry(retry, "link.upsert", || repo.upsert(link)).await {
            Err(e) if e.is_conflict() => {
                warn!(user_id = %link.user_id, error = %e, "Upsert raced, retrying once");
                with_retry(retry, "link.upsert", || repo.upsert(link)).await?;
            }
            other => other?,
        }
        Ok(())
    }

    /// Move the stored link from `expected` to `next`; false if it changed in between
    async fn swap(
        &self,
        expected: Option<&AccountLink>,
        next: Option<&AccountLink>,
    ) -> ServiceResult<bool> {
        let repo = self.ctx.link_repo();
        let retry = self.ctx.retry_config();

        let swapped = match (expected, next) {
            (None, Some(link)) => {
                with_retry(retry, "link.insert_new", || repo.insert_new(link)).await?
            }
            (Some(current), Some(link)) => {
                with_retry(retry, "link.replace_if", || repo.replace_if(link, &current.extras))
                    .await?
            }
            (Some(current), None) => {
                with_retry(retry, "link.delete_if", || {
                    repo.delete_if(current.user_id, &current.extras)
                })
                .await?
            }
            (None, None) => true,
        };
        Ok(swapped)
    }

    fn decrypt_accounts(&self, link: &AccountLink) -> Result<LinkedAccounts, DomainError> {
        let accounts: LinkedAccounts = self.ctx.cipher().decrypt_json(&link.extras)?;
        Ok(LinkedAccounts::from_vec(accounts.into_iter().collect()))
    }
}

fn contended(user_id: Snowflake) -> ServiceError {
    warn!(user_id = %user_id, attempts = MAX_EDIT_ATTEMPTS, "Link kept changing, giving up");
    DomainError::Conflict(format!("link for user {user_id} changed concurrently")).into()
}
