use std::sync::Arc;

use tracing::{debug, warn};

use crate::account::repository::AccountRepository;
use crate::errors::ServiceError;
use crate::product::domain::Product;
use crate::request::RequestEnvelope;

use super::hasher::CredentialHasher;

/// Account resolved from the request credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub username: String,
}

pub struct Authorizer {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl Authorizer {
    pub fn new(accounts: Arc<dyn AccountRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Resolve Basic credentials to a principal. Unknown handle and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, env: &RequestEnvelope) -> Result<Principal, ServiceError> {
        let creds = env.credentials.as_ref().ok_or(ServiceError::Unauthenticated)?;
        let username = creds.username.to_lowercase();
        let account = match self.accounts.find_account_by_username(&username).await? {
            Some(account) => account,
            None => {
                debug!(%username, "unknown username");
                return Err(ServiceError::Unauthenticated);
            }
        };
        match self.hasher.verify(&creds.password, &account.password_hash) {
            Ok(true) => Ok(Principal { id: account.id, username: account.username }),
            Ok(false) => {
                debug!(account_id = account.id, "password mismatch");
                Err(ServiceError::Unauthenticated)
            }
            Err(e) => {
                warn!(account_id = account.id, error = %e, "stored credential unreadable");
                Err(ServiceError::Unauthenticated)
            }
        }
    }

    /// Callers must have established that the product exists.
    pub fn ensure_owner(principal: &Principal, product: &Product) -> Result<(), ServiceError> {
        if product.owner_user_id == principal.id {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    pub fn ensure_self(principal: &Principal, account_id: i32) -> Result<(), ServiceError> {
        if principal.id == account_id {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}
