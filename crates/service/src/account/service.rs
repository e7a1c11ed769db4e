use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::domain::{AccountChanges, AccountView, NewAccountRecord};
use super::repository::AccountRepository;
use crate::auth::{Authorizer, CredentialHasher};
use crate::errors::ServiceError;
use crate::notify::{AccountCreated, NotificationPublisher};
use crate::request::RequestEnvelope;
use crate::response::Outcome;
use crate::validation::{self, account as rules, Rejection};

/// Account orchestrator independent of web framework
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    authorizer: Arc<Authorizer>,
    hasher: Arc<dyn CredentialHasher>,
    notifier: Arc<dyn NotificationPublisher>,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        authorizer: Arc<Authorizer>,
        hasher: Arc<dyn CredentialHasher>,
        notifier: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self { accounts, authorizer, hasher, notifier }
    }

    /// Register an account. The notification is sent in the background and its
    /// failure never reaches the caller.
    #[instrument(skip_all)]
    pub async fn create(&self, env: &RequestEnvelope, body: &[u8]) -> Result<Outcome<AccountView>, ServiceError> {
        validation::check_anonymous_write(env)?;
        let input = rules::decode_new_account(body)?;

        if self.accounts.find_account_by_username(&input.username).await?.is_some() {
            return Err(Rejection::DuplicateUsername.into());
        }

        let password_hash = self.hash(&input.password)?;
        let account = self
            .accounts
            .create_account(NewAccountRecord {
                first_name: input.first_name,
                last_name: input.last_name,
                username: input.username,
                password_hash,
            })
            .await?;
        info!(account_id = account.id, username = %account.username, "account_created");

        let notifier = self.notifier.clone();
        let event = AccountCreated { email: account.username.clone(), first_name: account.first_name.clone() };
        tokio::spawn(async move {
            if let Err(e) = notifier.publish(event).await {
                warn!(error = %e, "account_created notification failed");
            }
        });

        Ok(Outcome::Created(account.into()))
    }

    #[instrument(skip(self, env))]
    pub async fn get(&self, env: &RequestEnvelope, raw_id: &str) -> Result<Outcome<AccountView>, ServiceError> {
        validation::check_bodyless(env)?;
        let id = validation::parse_id(raw_id)?;
        let principal = self.authorizer.authenticate(env).await?;
        Authorizer::ensure_self(&principal, id)?;

        let account = self.accounts.find_account(id).await?.ok_or(ServiceError::NotFound("account"))?;
        Ok(Outcome::Ok(account.into()))
    }

    #[instrument(skip(self, env, body))]
    pub async fn update(&self, env: &RequestEnvelope, raw_id: &str, body: &[u8]) -> Result<Outcome<()>, ServiceError> {
        validation::check_write(env)?;
        let id = validation::parse_id(raw_id)?;
        let principal = self.authorizer.authenticate(env).await?;
        Authorizer::ensure_self(&principal, id)?;

        let input = rules::decode_account_update(body)?;
        let password_hash = self.hash(&input.password)?;
        self.accounts
            .update_account(
                id,
                AccountChanges {
                    first_name: input.first_name,
                    last_name: input.last_name,
                    password_hash,
                    updated_at: Utc::now(),
                },
            )
            .await?;
        info!(account_id = id, "account_updated");
        Ok(Outcome::NoContent)
    }

    fn hash(&self, password: &str) -> Result<String, ServiceError> {
        self.hasher.hash(password).map_err(|e| ServiceError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::auth::Argon2Hasher;
    use crate::notify::mock::{FailingPublisher, RecordingPublisher};
    use crate::repo::memory::InMemoryRepository;

    const FOO: &[u8] = br#"{"first_name":"Foo","last_name":"Bar","username":"Foo@Example.com","password":"secret123"}"#;

    fn service_with(notifier: Arc<dyn NotificationPublisher>) -> (Arc<InMemoryRepository>, AccountService) {
        let repo = Arc::new(InMemoryRepository::default());
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher);
        let authz = Arc::new(Authorizer::new(repo.clone(), hasher.clone()));
        (repo.clone(), AccountService::new(repo, authz, hasher, notifier))
    }

    fn anon_body() -> RequestEnvelope { RequestEnvelope::anonymous().with_body() }

    #[tokio::test]
    async fn register_then_authenticate_with_lowercased_handle() {
        let (_repo, svc) = service_with(Arc::new(RecordingPublisher::default()));
        let created = svc.create(&anon_body(), FOO).await.unwrap();
        assert_eq!(created.status(), 201);
        let view = created.into_body().unwrap();
        assert_eq!(view.username, "foo@example.com");

        let env = RequestEnvelope::basic("foo@example.com", "secret123");
        let read = svc.get(&env, &view.id.to_string()).await.unwrap();
        assert_eq!(read.into_body().unwrap().first_name, "Foo");
    }

    #[tokio::test]
    async fn duplicate_username_is_malformed_regardless_of_case() {
        let (_repo, svc) = service_with(Arc::new(RecordingPublisher::default()));
        svc.create(&anon_body(), FOO).await.unwrap();
        let again = br#"{"first_name":"X","last_name":"Y","username":"FOO@EXAMPLE.COM","password":"secret123"}"#;
        let err = svc.create(&anon_body(), again).await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(Rejection::DuplicateUsername)));
    }

    #[tokio::test]
    async fn notification_is_sent_after_create() {
        let publisher = Arc::new(RecordingPublisher::default());
        let (_repo, svc) = service_with(publisher.clone());
        svc.create(&anon_body(), FOO).await.unwrap();
        for _ in 0..50 {
            if !publisher.events().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let events = publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].email, "foo@example.com");
    }

    #[tokio::test]
    async fn notification_failure_is_not_surfaced() {
        let (repo, svc) = service_with(Arc::new(FailingPublisher));
        let created = svc.create(&anon_body(), FOO).await.unwrap();
        assert_eq!(created.status(), 201);
        assert!(repo.find_account_by_username("foo@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn store_outage_on_insert_is_unavailable() {
        let (repo, svc) = service_with(Arc::new(RecordingPublisher::default()));
        repo.fail_writes(true);
        let err = svc.create(&anon_body(), FOO).await.unwrap_err();
        assert_eq!(err.status(), 503);
    }

    #[tokio::test]
    async fn other_accounts_are_forbidden() {
        let (_repo, svc) = service_with(Arc::new(RecordingPublisher::default()));
        let a = svc.create(&anon_body(), FOO).await.unwrap().into_body().unwrap();
        let b = br#"{"first_name":"B","last_name":"B","username":"b@example.com","password":"secret123"}"#;
        svc.create(&anon_body(), b).await.unwrap();

        let env = RequestEnvelope::basic("b@example.com", "secret123");
        let err = svc.get(&env, &a.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));
    }

    #[tokio::test]
    async fn update_rehashes_password_and_touches_timestamp() {
        let (repo, svc) = service_with(Arc::new(RecordingPublisher::default()));
        let a = svc.create(&anon_body(), FOO).await.unwrap().into_body().unwrap();
        let env = RequestEnvelope::basic("foo@example.com", "secret123").with_body();
        let body = br#"{"first_name":"Fooz","last_name":"Bar","password":"newpass99"}"#;
        let out = svc.update(&env, &a.id.to_string(), body).await.unwrap();
        assert_eq!(out.status(), 204);

        let stored = repo.find_account(a.id).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Fooz");
        assert!(stored.account_updated >= a.account_updated);

        let old = RequestEnvelope::basic("foo@example.com", "secret123");
        assert!(matches!(svc.get(&old, &a.id.to_string()).await, Err(ServiceError::Unauthenticated)));
        let new = RequestEnvelope::basic("foo@example.com", "newpass99");
        assert!(svc.get(&new, &a.id.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn registration_with_credentials_is_rejected() {
        let (_repo, svc) = service_with(Arc::new(RecordingPublisher::default()));
        let env = RequestEnvelope::basic("x@y.zz", "whatever1").with_body();
        let err = svc.create(&env, FOO).await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(Rejection::AuthorizationNotAllowed)));
    }
}
