//! Stats service
//!
//! Command usage counters. Increments happen in storage; this service never
//! reads a count back to add to it.

use latte_core::{CommandStat, CommandType};
use tracing::{debug, instrument};

use super::context::StoreContext;
use super::dispatcher::CommandInvocation;
use super::error::ServiceResult;
use super::retry::with_retry;

/// Stats service
pub struct StatsService<'a> {
    ctx: &'a StoreContext,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Count one use of a command
    #[instrument(skip(self))]
    pub async fn record_use(&self, name: &str, command_type: CommandType) -> ServiceResult<()> {
        let repo = self.ctx.stat_repo();
        with_retry(self.ctx.retry_config(), "stats.record_use", || {
            repo.record_use(name, command_type)
        })
        .await?;
        Ok(())
    }

    /// Count a finished invocation unless the bot owner made it
    ///
    /// Returns whether the use was counted.
    pub async fn record_completion(&self, invocation: &CommandInvocation) -> ServiceResult<bool> {
        if self.ctx.bot_config().owner_id == Some(invocation.user_id) {
            debug!(command = %invocation.name, "Owner invocation not counted");
            return Ok(false);
        }
        self.record_use(&invocation.name, invocation.kind).await?;
        Ok(true)
    }

    /// Current count for one command; zero if it was never used
    pub async fn uses(&self, name: &str, command_type: CommandType) -> ServiceResult<u64> {
        let repo = self.ctx.stat_repo();
        let stat = with_retry(self.ctx.retry_config(), "stats.find", || {
            repo.find(name, command_type)
        })
        .await?;
        Ok(stat.map_or(0, |s| s.uses))
    }

    /// Snapshot of every counter, most used first
    #[instrument(skip(self))]
    pub async fn stats(&self) -> ServiceResult<Vec<CommandStat>> {
        let repo = self.ctx.stat_repo();
        Ok(with_retry(self.ctx.retry_config(), "stats.find_all", || repo.find_all()).await?)
    }
}
