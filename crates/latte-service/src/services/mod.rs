//! Business logic services
//!
//! Services borrow a [`StoreContext`] and are cheap to construct per call.

pub mod account;
pub mod blacklist;
pub mod context;
pub mod dispatcher;
pub mod error;
mod retry;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use account::AccountService;
pub use blacklist::{BlacklistCache, BlacklistService};
pub use context::{StoreContext, StoreContextBuilder};
pub use dispatcher::{CommandDispatcher, CommandInvocation};
pub use error::{ServiceError, ServiceResult};
pub use stats::StatsService;
