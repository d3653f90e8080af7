//! Account link database model

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database model for the riot_accounts table
#[derive(Clone, FromRow)]
pub struct AccountLinkModel {
    pub user_id: i64,
    pub guild_id: Option<i64>,
    pub extras: Vec<u8>,
    pub date_signed: NaiveDateTime,
    pub locale: String,
}

impl std::fmt::Debug for AccountLinkModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLinkModel")
            .field("user_id", &self.user_id)
            .field("guild_id", &self.guild_id)
            .field("extras", &format!("<{} bytes>", self.extras.len()))
            .field("date_signed", &self.date_signed)
            .field("locale", &self.locale)
            .finish()
    }
}
