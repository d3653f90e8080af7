//! PostgreSQL implementation of BlacklistRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use latte_core::traits::{BlacklistRepository, RepoResult};
use latte_core::{BlacklistEntry, Snowflake};

use crate::mappers::BlacklistInsert;
use crate::models::BlacklistModel;

use super::error::map_db_error;

/// PostgreSQL implementation of BlacklistRepository
#[derive(Clone)]
pub struct PgBlacklistRepository {
    pool: PgPool,
}

impl PgBlacklistRepository {
    /// Create a new PgBlacklistRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistRepository for PgBlacklistRepository {
    #[instrument(skip(self, entry), fields(snowflake = %entry.snowflake))]
    async fn add(&self, entry: &BlacklistEntry) -> RepoResult<()> {
        let insert = BlacklistInsert::new(entry);

        sqlx::query(
            r"
            INSERT INTO blacklist (snowflake, reason, date_added)
            VALUES ($1, $2, $3)
            ON CONFLICT (snowflake) DO UPDATE SET reason = $2, date_added = $3
            ",
        )
        .bind(insert.snowflake)
        .bind(insert.reason)
        .bind(insert.date_added)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn contains(&self, snowflake: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM blacklist WHERE snowflake = $1)
            ",
        )
        .bind(snowflake.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn find(&self, snowflake: Snowflake) -> RepoResult<Option<BlacklistEntry>> {
        let result = sqlx::query_as::<_, BlacklistModel>(
            r"
            SELECT snowflake, reason, date_added
            FROM blacklist
            WHERE snowflake = $1
            ",
        )
        .bind(snowflake.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(BlacklistEntry::from))
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<BlacklistEntry>> {
        let results = sqlx::query_as::<_, BlacklistModel>(
            r"
            SELECT snowflake, reason, date_added
            FROM blacklist
            ORDER BY date_added DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(BlacklistEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn remove(&self, snowflake: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM blacklist WHERE snowflake = $1
            ",
        )
        .bind(snowflake.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgBlacklistRepository>();
    }
}
