//! Domain entities - core business objects

mod account_link;
mod blacklist;
mod command_stat;
mod riot_account;

pub use account_link::{AccountLink, EncryptedExtras, MAX_EXTRAS_LEN};
pub use blacklist::BlacklistEntry;
pub use command_stat::{CommandStat, CommandType};
pub use riot_account::{LinkedAccounts, RiotAccount};
