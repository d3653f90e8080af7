//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account_link;
mod blacklist;
mod command_stat;

pub use account_link::AccountLinkModel;
pub use blacklist::BlacklistModel;
pub use command_stat::CommandStatModel;
