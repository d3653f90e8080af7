//! Riot accounts - the plaintext contents of an account link's encrypted payload
//!
//! A user may link several Riot accounts. They are kept as an ordered list and
//! addressed by `acc_num`, a 1-based position that is renumbered whenever the
//! list changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::DomainError;

/// Session material for one Riot account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiotAccount {
    pub puuid: String,
    pub name: String,
    pub tag: String,
    pub region: String,
    pub access_token: String,
    pub id_token: String,
    pub entitlements_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Unix seconds
    pub expires_at: i64,
    #[serde(default, rename = "cookie")]
    pub cookies: HashMap<String, String>,
    #[serde(default)]
    pub acc_num: usize,
    #[serde(default)]
    pub hide_display_name: bool,
    #[serde(default)]
    pub notify_mode: Option<String>,
    #[serde(default)]
    pub night_market_is_opened: bool,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl RiotAccount {
    /// `name#tag`
    pub fn riot_id(&self) -> String {
        format!("{}#{}", self.name, self.tag)
    }

    /// Name shown in chat, honouring the user's privacy toggle
    pub fn display_name(&self) -> String {
        if self.hide_display_name {
            format!("Account {}", self.acc_num)
        } else {
            self.riot_id()
        }
    }

    /// Whether the access token has expired at `now` (unix seconds)
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for RiotAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiotAccount")
            .field("puuid", &self.puuid)
            .field("riot_id", &self.riot_id())
            .field("region", &self.region)
            .field("acc_num", &self.acc_num)
            .field("expires_at", &self.expires_at)
            .field("tokens", &"<redacted>")
            .field("cookies", &format!("<{} redacted>", self.cookies.len()))
            .finish_non_exhaustive()
    }
}

/// The ordered list of Riot accounts behind one account link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkedAccounts(Vec<RiotAccount>);

impl LinkedAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored data, normalising `acc_num` ordering
    pub fn from_vec(mut accounts: Vec<RiotAccount>) -> Self {
        accounts.sort_by_key(|a| a.acc_num);
        let mut linked = Self(accounts);
        linked.renumber();
        linked
    }

    /// Append an account, rejecting one whose `puuid` is already linked
    pub fn add(&mut self, mut account: RiotAccount) -> Result<&RiotAccount, DomainError> {
        if self.0.iter().any(|a| a.puuid == account.puuid) {
            return Err(DomainError::AccountAlreadyLinked);
        }
        account.acc_num = self.0.len() + 1;
        self.0.push(account);
        self.renumber();
        Ok(&self.0[self.0.len() - 1])
    }

    /// Remove the account with the given 1-based number
    pub fn remove(&mut self, number: usize) -> Result<RiotAccount, DomainError> {
        let index = self
            .0
            .iter()
            .position(|a| a.acc_num == number)
            .ok_or(DomainError::InvalidAccountNumber(number))?;
        let removed = self.0.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Find an account by Riot name or tag
    pub fn find_by_riot_id(&self, name_or_tag: &str) -> Option<&RiotAccount> {
        self.0
            .iter()
            .find(|a| a.name == name_or_tag || a.tag == name_or_tag || a.riot_id() == name_or_tag)
    }

    pub fn get(&self, number: usize) -> Option<&RiotAccount> {
        self.0.iter().find(|a| a.acc_num == number)
    }

    pub fn first(&self) -> Option<&RiotAccount> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RiotAccount> {
        self.0.iter()
    }

    fn renumber(&mut self) {
        for (index, account) in self.0.iter_mut().enumerate() {
            account.acc_num = index + 1;
        }
    }
}

impl IntoIterator for LinkedAccounts {
    type Item = RiotAccount;
    type IntoIter = std::vec::IntoIter<RiotAccount>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(puuid: &str, name: &str) -> RiotAccount {
        RiotAccount {
            puuid: puuid.to_string(),
            name: name.to_string(),
            tag: "0001".to_string(),
            region: "ap".to_string(),
            access_token: "access-secret".to_string(),
            id_token: "id-secret".to_string(),
            entitlements_token: "ent-secret".to_string(),
            token_type: "Bearer".to_string(),
            expires_at: 1_700_000_000,
            cookies: HashMap::from([("ssid".to_string(), "cookie-secret".to_string())]),
            acc_num: 0,
            hide_display_name: false,
            notify_mode: None,
            night_market_is_opened: false,
        }
    }

    #[test]
    fn test_add_assigns_numbers() {
        let mut accounts = LinkedAccounts::new();
        assert_eq!(accounts.add(account("a", "latte")).unwrap().acc_num, 1);
        assert_eq!(accounts.add(account("b", "mocha")).unwrap().acc_num, 2);
        assert_eq!(accounts.len(), 2);
    }

    #[test]
    fn test_add_rejects_duplicate_puuid() {
        let mut accounts = LinkedAccounts::new();
        accounts.add(account("a", "latte")).unwrap();
        assert!(matches!(
            accounts.add(account("a", "renamed")),
            Err(DomainError::AccountAlreadyLinked)
        ));
        assert_eq!(accounts.len(), 1);
    }

    #[test]
    fn test_remove_renumbers() {
        let mut accounts = LinkedAccounts::new();
        accounts.add(account("a", "one")).unwrap();
        accounts.add(account("b", "two")).unwrap();
        accounts.add(account("c", "three")).unwrap();

        let removed = accounts.remove(2).unwrap();
        assert_eq!(removed.puuid, "b");

        let numbers: Vec<_> = accounts.iter().map(|a| (a.puuid.as_str(), a.acc_num)).collect();
        assert_eq!(numbers, vec![("a", 1), ("c", 2)]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut accounts = LinkedAccounts::new();
        accounts.add(account("a", "one")).unwrap();
        assert!(matches!(
            accounts.remove(0),
            Err(DomainError::InvalidAccountNumber(0))
        ));
        assert!(matches!(
            accounts.remove(2),
            Err(DomainError::InvalidAccountNumber(2))
        ));
    }

    #[test]
    fn test_find_by_riot_id() {
        let mut accounts = LinkedAccounts::new();
        accounts.add(account("a", "latte")).unwrap();
        assert_eq!(accounts.find_by_riot_id("latte").unwrap().puuid, "a");
        assert_eq!(accounts.find_by_riot_id("latte#0001").unwrap().puuid, "a");
        assert!(accounts.find_by_riot_id("espresso").is_none());
    }

    #[test]
    fn test_from_vec_normalises_order() {
        let mut first = account("a", "one");
        first.acc_num = 5;
        let mut second = account("b", "two");
        second.acc_num = 2;

        let accounts = LinkedAccounts::from_vec(vec![first, second]);
        assert_eq!(accounts.first().unwrap().puuid, "b");
        assert_eq!(accounts.get(2).unwrap().puuid, "a");
    }

    #[test]
    fn test_json_shape_matches_stored_payload() {
        let mut accounts = LinkedAccounts::new();
        accounts.add(account("a", "latte")).unwrap();

        let json = serde_json::to_value(&accounts).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["acc_num"], 1);
        assert_eq!(json[0]["cookie"]["ssid"], "cookie-secret");

        let back: LinkedAccounts = serde_json::from_value(json).unwrap();
        assert_eq!(back, accounts);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", account("a", "latte"));
        assert!(debug.contains("latte#0001"));
        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("cookie-secret"));
    }

    #[test]
    fn test_display_name_respects_privacy() {
        let mut acc = account("a", "latte");
        acc.acc_num = 3;
        assert_eq!(acc.display_name(), "latte#0001");
        acc.hide_display_name = true;
        assert_eq!(acc.display_name(), "Account 3");
    }

    #[test]
    fn test_is_expired() {
        let acc = account("a", "latte");
        assert!(!acc.is_expired(1_699_999_999));
        assert!(acc.is_expired(1_700_000_000));
    }
}
