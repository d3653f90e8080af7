//! Entity to model mappers
//!
//! This module provides conversions between domain entities (latte-core) and database models.
//! - `From<Model> for Entity` / `TryFrom<Model> for Entity`: convert database rows to domain objects
//! - `*Insert` structs: prepare entity data for database writes
//!
//! `TIMESTAMP` columns carry no zone; values are written and read as UTC.

mod account_link;
mod blacklist;
mod command_stat;

pub use account_link::AccountLinkInsert;
pub use blacklist::BlacklistInsert;
