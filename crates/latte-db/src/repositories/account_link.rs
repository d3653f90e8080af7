//! PostgreSQL implementation of AccountLinkRepository
//!
//! The `extras` column is opaque ciphertext; spans never record it.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use latte_core::traits::{AccountLinkRepository, RepoResult};
use latte_core::{AccountLink, EncryptedExtras, Snowflake};

use crate::mappers::AccountLinkInsert;
use crate::models::AccountLinkModel;

use super::error::map_db_error;

/// PostgreSQL implementation of AccountLinkRepository
#[derive(Clone)]
pub struct PgAccountLinkRepository {
    pool: PgPool,
}

impl PgAccountLinkRepository {
    /// Create a new PgAccountLinkRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountLinkRepository for PgAccountLinkRepository {
    #[instrument(skip(self, link), fields(user_id = %link.user_id))]
    async fn upsert(&self, link: &AccountLink) -> RepoResult<()> {
        let insert = AccountLinkInsert::new(link);

        sqlx::query(
            r"
            INSERT INTO riot_accounts (user_id, guild_id, extras, date_signed, locale)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET guild_id = EXCLUDED.guild_id,
                extras = EXCLUDED.extras,
                date_signed = EXCLUDED.date_signed,
                locale = EXCLUDED.locale
            ",
        )
        .bind(insert.user_id)
        .bind(insert.guild_id)
        .bind(insert.extras)
        .bind(insert.date_signed)
        .bind(insert.locale)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        debug!(extras_len = link.extras.len(), "account link upserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Snowflake) -> RepoResult<Option<AccountLink>> {
        let result = sqlx::query_as::<_, AccountLinkModel>(
            r"
            SELECT user_id, guild_id, extras, date_signed, locale
            FROM riot_accounts
            WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(AccountLink::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<AccountLink>> {
        let results = sqlx::query_as::<_, AccountLinkModel>(
            r"
            SELECT user_id, guild_id, extras, date_signed, locale
            FROM riot_accounts
            ORDER BY date_signed DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(AccountLink::try_from).collect()
    }

    #[instrument(skip(self, link), fields(user_id = %link.user_id))]
    async fn insert_new(&self, link: &AccountLink) -> RepoResult<bool> {
        let insert = AccountLinkInsert::new(link);

        let result = sqlx::query(
            r"
            INSERT INTO riot_accounts (user_id, guild_id, extras, date_signed, locale)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(insert.user_id)
        .bind(insert.guild_id)
        .bind(insert.extras)
        .bind(insert.date_signed)
        .bind(insert.locale)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, link, expected), fields(user_id = %link.user_id))]
    async fn replace_if(
        &self,
        link: &AccountLink,
        expected: &EncryptedExtras,
    ) -> RepoResult<bool> {
        let insert = AccountLinkInsert::new(link);

        let result = sqlx::query(
            r"
            UPDATE riot_accounts
            SET guild_id = $2, extras = $3, date_signed = $4, locale = $5
            WHERE user_id = $1 AND extras = $6
            ",
        )
        .bind(insert.user_id)
        .bind(insert.guild_id)
        .bind(insert.extras)
        .bind(insert.date_signed)
        .bind(insert.locale)
        .bind(expected.as_bytes())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let replaced = result.rows_affected() > 0;
        if !replaced {
            debug!("account link changed since it was read");
        }
        Ok(replaced)
    }

    #[instrument(skip(self, expected))]
    async fn delete_if(&self, user_id: Snowflake, expected: &EncryptedExtras) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM riot_accounts WHERE user_id = $1 AND extras = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(expected.as_bytes())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM riot_accounts WHERE user_id = $1
            ",
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let removed = sqlx::query_scalar::<_, i64>(
            r"
            DELETE FROM riot_accounts WHERE guild_id = $1 RETURNING user_id
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(removed.into_iter().map(Snowflake::new).collect())
    }
}
