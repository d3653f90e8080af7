//! BlacklistEntry entity <-> model mapper

use chrono::NaiveDateTime;
use latte_core::{BlacklistEntry, Snowflake};

use crate::models::BlacklistModel;

/// Convert BlacklistModel to BlacklistEntry entity
impl From<BlacklistModel> for BlacklistEntry {
    fn from(model: BlacklistModel) -> Self {
        BlacklistEntry {
            snowflake: Snowflake::new(model.snowflake),
            reason: model.reason,
            date_added: model.date_added.and_utc(),
        }
    }
}

/// BlacklistEntry values for the insert statement
pub struct BlacklistInsert<'a> {
    pub snowflake: i64,
    pub reason: Option<&'a str>,
    pub date_added: NaiveDateTime,
}

impl<'a> BlacklistInsert<'a> {
    pub fn new(entry: &'a BlacklistEntry) -> Self {
        Self {
            snowflake: entry.snowflake.into_inner(),
            reason: entry.reason.as_deref(),
            date_added: entry.date_added.naive_utc(),
        }
    }
}
