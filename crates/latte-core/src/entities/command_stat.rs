//! Command usage statistics

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// How a command was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Application (slash) command
    Slash,
    /// Prefix/mention text command
    Text,
    /// Right-click on a user
    UserContextMenu,
    /// Right-click on a message
    MessageContextMenu,
}

impl CommandType {
    /// Storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slash => "slash",
            Self::Text => "text",
            Self::UserContextMenu => "user_context_menu",
            Self::MessageContextMenu => "message_context_menu",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slash" => Ok(Self::Slash),
            "text" => Ok(Self::Text),
            "user_context_menu" => Ok(Self::UserContextMenu),
            "message_context_menu" => Ok(Self::MessageContextMenu),
            other => Err(DomainError::ValidationError(format!(
                "unknown command type: {other}"
            ))),
        }
    }
}

/// Usage counter for one (name, type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStat {
    pub name: String,
    #[serde(rename = "type")]
    pub command_type: CommandType,
    pub uses: u64,
}

impl CommandStat {
    /// Longest command name the `name` column accepts
    pub const MAX_NAME_LEN: usize = 100;

    /// Check a command name before it is counted
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "command name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > Self::MAX_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "command name longer than {} characters",
                Self::MAX_NAME_LEN
            )));
        }
        Ok(())
    }
}
