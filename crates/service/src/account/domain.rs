use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stored account, including the credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub account_created: DateTime<Utc>,
    pub account_updated: DateTime<Utc>,
}

/// Outward view of an account; there is no hash field to leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub account_created: DateTime<Utc>,
    pub account_updated: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name,
            last_name: a.last_name,
            username: a.username,
            account_created: a.account_created,
            account_updated: a.account_updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccountRecord {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub updated_at: DateTime<Utc>,
}
