//! Blacklist database model

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database model for the blacklist table
#[derive(Debug, Clone, FromRow)]
pub struct BlacklistModel {
    pub snowflake: i64,
    pub reason: Option<String>,
    pub date_added: NaiveDateTime,
}
