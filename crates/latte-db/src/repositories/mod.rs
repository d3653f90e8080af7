//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in latte-core.
//! Each repository handles database operations for one table.

mod account_link;
mod blacklist;
mod command_stat;
mod error;

pub use account_link::PgAccountLinkRepository;
pub use blacklist::PgBlacklistRepository;
pub use command_stat::PgCommandStatRepository;
pub use error::map_db_error;
