//! Database connection pool management

mod postgres;

pub use postgres::{connect_with_retry, create_pool};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
