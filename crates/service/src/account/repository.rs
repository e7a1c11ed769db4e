use async_trait::async_trait;

use super::domain::{Account, AccountChanges, NewAccountRecord};
use crate::errors::RepositoryError;

/// Repository abstraction for account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_account(&self, id: i32) -> Result<Option<Account>, RepositoryError>;
    /// `username` must already be lowercased.
    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError>;
    async fn create_account(&self, new: NewAccountRecord) -> Result<Account, RepositoryError>;
    async fn update_account(&self, id: i32, changes: AccountChanges) -> Result<(), RepositoryError>;
}
