//! AccountLink entity <-> model mapper

use chrono::NaiveDateTime;
use latte_core::{AccountLink, DomainError, EncryptedExtras, Locale, Snowflake};

use crate::models::AccountLinkModel;

/// Convert AccountLinkModel to AccountLink entity
impl TryFrom<AccountLinkModel> for AccountLink {
    type Error = DomainError;

    fn try_from(model: AccountLinkModel) -> Result<Self, Self::Error> {
        Ok(AccountLink {
            user_id: Snowflake::new(model.user_id),
            guild_id: model.guild_id.map(Snowflake::new),
            extras: EncryptedExtras::new(model.extras)?,
            date_signed: model.date_signed.and_utc(),
            locale: Locale::new(model.locale)?,
        })
    }
}

/// AccountLink values for the upsert statement
pub struct AccountLinkInsert<'a> {
    pub user_id: i64,
    pub guild_id: Option<i64>,
    pub extras: &'a [u8],
    pub date_signed: NaiveDateTime,
    pub locale: &'a str,
}

impl<'a> AccountLinkInsert<'a> {
    pub fn new(link: &'a AccountLink) -> Self {
        Self {
            user_id: link.user_id.into_inner(),
            guild_id: link.guild_id.map(Snowflake::into_inner),
            extras: link.extras.as_bytes(),
            date_signed: link.date_signed.naive_utc(),
            locale: link.locale.as_str(),
        }
    }
}
