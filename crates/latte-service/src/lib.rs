//! # latte-service
//!
//! Application layer: the services the bot's command handlers call into.
//!
//! - [`AccountService`]: encrypted account links, including multi-account edits
//! - [`BlacklistService`]: the gate every command passes through, cached in memory
//! - [`StatsService`]: per-command usage counters
//! - [`CommandDispatcher`]: runs a handler behind the gate, a timeout and the counter

pub mod services;

pub use services::{
    AccountService, BlacklistCache, BlacklistService, CommandDispatcher, CommandInvocation,
    ServiceError, ServiceResult, StatsService, StoreContext, StoreContextBuilder,
};
