//! Snowflake ID - Discord 64-bit identifier for users, guilds and everything else
//!
//! Discord hands out unsigned ids, but every id issued so far fits in an `i64`,
//! which is what PostgreSQL `BIGINT` columns hold.

use std::fmt;

/// Discord Snowflake ID (64-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Create a new Snowflake from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_creation() {
        let sf = Snowflake::new(123_456_789);
        assert_eq!(sf.into_inner(), 123_456_789);
    }

    #[test]
    fn test_snowflake_parse() {
        let sf = Snowflake::parse("989337541389987861").unwrap();
        assert_eq!(sf.into_inner(), 989_337_541_389_987_861);

        assert!(Snowflake::parse(" 42 ").is_ok());
        assert!(Snowflake::parse("invalid").is_err());
        assert!(Snowflake::parse("").is_err());
    }

    #[test]
    fn test_snowflake_display() {
        assert_eq!(Snowflake::new(123_456_789).to_string(), "123456789");
    }

    #[test]
    fn test_snowflake_from_str_round_trips_display() {
        let sf: Snowflake = "175928847299117063".parse().unwrap();
        assert_eq!(sf.to_string(), "175928847299117063");
        assert_eq!(i64::from(sf), 175_928_847_299_117_063);
    }
}
