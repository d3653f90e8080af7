//! Command dispatcher
//!
//! The one path every command handler runs through: blacklist gate, bounded
//! execution, then the usage counter.

use std::future::Future;

use latte_core::{CommandType, Snowflake};
use tracing::{instrument, warn};

use super::blacklist::BlacklistService;
use super::context::StoreContext;
use super::error::{ServiceError, ServiceResult};
use super::stats::StatsService;

/// What the chat gateway tells us about an incoming command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub user_id: Snowflake,
    /// `None` in direct messages
    pub guild_id: Option<Snowflake>,
    pub name: String,
    pub kind: CommandType,
}

impl CommandInvocation {
    pub fn new(
        user_id: Snowflake,
        guild_id: Option<Snowflake>,
        name: impl Into<String>,
        kind: CommandType,
    ) -> Self {
        Self {
            user_id,
            guild_id,
            name: name.into(),
            kind,
        }
    }
}

/// Runs command handlers
pub struct CommandDispatcher<'a> {
    ctx: &'a StoreContext,
}

impl<'a> CommandDispatcher<'a> {
    /// Create a new CommandDispatcher
    pub fn new(ctx: &'a StoreContext) -> Self {
        Self { ctx }
    }

    /// Run `handler` for `invocation`
    ///
    /// Blacklisted and timed-out invocations are not counted. A failure to
    /// record usage is logged and does not fail the command.
    ///
    /// # Errors
    /// Returns `ServiceError::Blacklisted`, `ServiceError::Timeout`, or the
    /// handler's own error
    #[instrument(skip(self, handler), fields(command = %invocation.name, user_id = %invocation.user_id))]
    pub async fn dispatch<T, F>(&self, invocation: &CommandInvocation, handler: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        BlacklistService::new(self.ctx)
            .check_request(invocation.user_id, invocation.guild_id)
            .await?;

        let limit = self.ctx.bot_config().command_timeout;
        let output = tokio::time::timeout(limit, handler)
            .await
            .map_err(|_| ServiceError::Timeout(limit))??;

        if let Err(e) = StatsService::new(self.ctx).record_completion(invocation).await {
            warn!(error = %e, code = e.error_code(), "Failed to record command usage");
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::TestStores;
    use latte_common::BotConfig;
    use std::time::Duration;

    fn invocation(user: i64, guild: Option<i64>) -> CommandInvocation {
        CommandInvocation::new(
            Snowflake::new(user),
            guild.map(Snowflake::new),
            "store",
            CommandType::Slash,
        )
    }

    #[tokio::test]
    async fn test_successful_command_is_counted() {
        let ctx = TestStores::new().context();
        let dispatcher = CommandDispatcher::new(&ctx);

        let output = dispatcher
            .dispatch(&invocation(1, Some(10)), async { Ok("shop") })
            .await
            .unwrap();

        assert_eq!(output, "shop");
        let uses = StatsService::new(&ctx).uses("store", CommandType::Slash).await.unwrap();
        assert_eq!(uses, 1);
    }

    #[tokio::test]
    async fn test_blacklisted_user_is_rejected_and_not_counted() {
        let ctx = TestStores::new().context();
        BlacklistService::new(&ctx).add(Snowflake::new(1), None).await.unwrap();
        let dispatcher = CommandDispatcher::new(&ctx);

        let err = dispatcher
            .dispatch(&invocation(1, None), async { Ok(()) })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Blacklisted(_)));
        assert!(StatsService::new(&ctx).stats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blacklisted_guild_is_rejected() {
        let ctx = TestStores::new().context();
        BlacklistService::new(&ctx).add(Snowflake::new(10), None).await.unwrap();
        let dispatcher = CommandDispatcher::new(&ctx);

        let err = dispatcher
            .dispatch(&invocation(1, Some(10)), async { Ok(()) })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Blacklisted(id) if id == Snowflake::new(10)));
    }

    #[tokio::test]
    async fn test_handler_is_not_run_for_blacklisted_user() {
        let ctx = TestStores::new().context();
        BlacklistService::new(&ctx).add(Snowflake::new(1), None).await.unwrap();
        let ran = std::sync::atomic::AtomicBool::new(false);

        let _ = CommandDispatcher::new(&ctx)
            .dispatch(&invocation(1, None), async {
                ran.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_slow_handler_times_out_and_is_not_counted() {
        let stores = TestStores::new();
        let ctx = stores.context_with(BotConfig {
            command_timeout: Duration::from_millis(20),
            ..BotConfig::default()
        });

        let err = CommandDispatcher::new(&ctx)
            .dispatch(&invocation(1, None), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Timeout(_)));
        assert!(StatsService::new(&ctx).stats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_handler_is_not_counted() {
        let ctx = TestStores::new().context();

        let err = CommandDispatcher::new(&ctx)
            .dispatch::<(), _>(&invocation(1, None), async {
                Err(ServiceError::validation("bad input"))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(StatsService::new(&ctx).stats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_outage_does_not_fail_command() {
        let stores = TestStores::new();
        let ctx = stores.context();
        stores.stats.fail_next(100);

        let output = CommandDispatcher::new(&ctx)
            .dispatch(&invocation(1, None), async { Ok(5) })
            .await
            .unwrap();

        assert_eq!(output, 5);
    }
}
