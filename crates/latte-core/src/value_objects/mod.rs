//! Value objects - immutable types that represent domain concepts

mod locale;
mod snowflake;

pub use locale::Locale;
pub use snowflake::{Snowflake, SnowflakeParseError};
