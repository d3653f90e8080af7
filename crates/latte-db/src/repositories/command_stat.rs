//! PostgreSQL implementation of CommandStatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use latte_core::traits::{CommandStatRepository, RepoResult};
use latte_core::{CommandStat, CommandType};

use crate::models::CommandStatModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CommandStatRepository
#[derive(Clone)]
pub struct PgCommandStatRepository {
    pool: PgPool,
}

impl PgCommandStatRepository {
    /// Create a new PgCommandStatRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommandStatRepository for PgCommandStatRepository {
    /// Increment happens inside the statement; concurrent callers serialize on the row lock.
    #[instrument(skip(self))]
    async fn record_use(&self, name: &str, command_type: CommandType) -> RepoResult<()> {
        CommandStat::validate_name(name)?;

        sqlx::query(
            r"
            INSERT INTO command_stats (name, type, uses)
            VALUES ($1, $2, 1)
            ON CONFLICT (name, type) DO UPDATE SET uses = command_stats.uses + 1
            ",
        )
        .bind(name)
        .bind(command_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        name: &str,
        command_type: CommandType,
    ) -> RepoResult<Option<CommandStat>> {
        let result = sqlx::query_as::<_, CommandStatModel>(
            r"
            SELECT name, type, uses
            FROM command_stats
            WHERE name = $1 AND type = $2
            ",
        )
        .bind(name)
        .bind(command_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(CommandStat::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<CommandStat>> {
        let results = sqlx::query_as::<_, CommandStatModel>(
            r"
            SELECT name, type, uses
            FROM command_stats
            ORDER BY uses DESC, name ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(CommandStat::try_from).collect()
    }
}
