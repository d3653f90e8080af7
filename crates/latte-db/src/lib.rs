//! # latte-db
//!
//! Database layer implementing the latte repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `latte-core`. It handles:
//!
//! - Connection pool management (with bounded retry on connect)
//! - Idempotent schema bootstrap
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use latte_common::AppConfig;
//! use latte_core::traits::AccountLinkRepository;
//! use latte_db::{connect_with_retry, ensure_schema, PgAccountLinkRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = connect_with_retry(&config.database, &config.retry).await?;
//!     ensure_schema(&pool).await?;
//!     let links = PgAccountLinkRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{connect_with_retry, create_pool, PgPool};
pub use repositories::{PgAccountLinkRepository, PgBlacklistRepository, PgCommandStatRepository};
pub use schema::{ensure_schema, verify_unique_keys};
