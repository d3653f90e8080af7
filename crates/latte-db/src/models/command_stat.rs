//! Command stat database model

use sqlx::FromRow;

/// Database model for the command_stats table
#[derive(Debug, Clone, FromRow)]
pub struct CommandStatModel {
    pub name: String,
    #[sqlx(rename = "type")]
    pub command_type: String,
    pub uses: i64,
}
