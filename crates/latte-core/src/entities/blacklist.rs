//! Blacklist entry - a user or guild the bot refuses to serve

use chrono::{DateTime, SubsecRound, Utc};

use crate::value_objects::Snowflake;

/// Blacklist record
///
/// `snowflake` may name a user or a guild; both share one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistEntry {
    pub snowflake: Snowflake,
    pub reason: Option<String>,
    pub date_added: DateTime<Utc>,
}

impl BlacklistEntry {
    /// Create an entry dated now
    pub fn new(snowflake: Snowflake, reason: Option<String>) -> Self {
        Self {
            snowflake,
            reason: reason.filter(|r| !r.trim().is_empty()),
            date_added: Utc::now().trunc_subsecs(6),
        }
    }
}
