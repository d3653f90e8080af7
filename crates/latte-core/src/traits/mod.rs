//! Repository traits

mod repositories;

pub use repositories::{
    AccountLinkRepository, BlacklistRepository, CommandStatRepository, RepoResult,
};
