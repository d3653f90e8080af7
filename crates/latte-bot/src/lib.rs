//! # latte-bot
//!
//! Process wiring: connect to storage, ensure the schema, run the startup
//! maintenance the bot does before it accepts commands, then wait for shutdown.

use latte_common::{AppConfig, AppResult};
use latte_db::{connect_with_retry, ensure_schema};
use latte_service::{AccountService, BlacklistService, StatsService, StoreContext};
use tracing::info;

/// Build the store context and bring it to a ready state
///
/// The blacklist cache is warm and links of blacklisted users are gone when
/// this returns.
pub async fn startup(config: &AppConfig) -> AppResult<StoreContext> {
    info!(url = %config.database.redacted_url(), "Connecting to PostgreSQL...");
    let pool = connect_with_retry(&config.database, &config.retry).await?;
    ensure_schema(&pool).await?;

    let ctx = StoreContext::from_pool(pool, config)?;

    let blacklist = BlacklistService::new(&ctx);
    let listed = blacklist.warm_cache().await?;
    let purged = AccountService::new(&ctx).purge_blacklisted(&blacklist).await?;
    let commands = StatsService::new(&ctx).stats().await?.len();

    info!(
        blacklisted = listed,
        purged,
        tracked_commands = commands,
        owner_id = ?config.bot.owner_id,
        support_guild_id = ?config.bot.support_guild_id,
        "Store ready"
    );
    Ok(ctx)
}

/// Run until Ctrl-C
pub async fn run(config: AppConfig) -> AppResult<()> {
    let ctx = startup(&config).await?;

    tokio::signal::ctrl_c()
        .await
        .map_err(latte_common::AppError::internal)?;

    info!(blacklist_cache = ctx.blacklist_cache().len(), "Shutting down");
    Ok(())
}
