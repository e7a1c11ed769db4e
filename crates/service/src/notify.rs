//! Registration notifications. Delivery is best effort; callers log failures and move on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::NotificationConfig;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Emitted once a new account row is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountCreated {
    pub email: String,
    pub first_name: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("endpoint rejected event: HTTP {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, event: AccountCreated) -> Result<(), NotifyError>;
}

pub fn from_config(cfg: &NotificationConfig) -> anyhow::Result<Arc<dyn NotificationPublisher>> {
    match &cfg.webhook_url {
        Some(url) => Ok(Arc::new(WebhookPublisher::new(url, Duration::from_secs(cfg.timeout_secs))?)),
        None => Ok(Arc::new(LogPublisher)),
    }
}

/// POSTs each event as JSON to a fixed URL.
pub struct WebhookPublisher {
    client: reqwest::Client,
    url: String,
}

impl WebhookPublisher {
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.to_string() })
    }
}

#[async_trait]
impl NotificationPublisher for WebhookPublisher {
    async fn publish(&self, event: AccountCreated) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&event)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(NotifyError::Rejected(resp.status().as_u16()));
        }
        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct LogPublisher;

#[async_trait]
impl NotificationPublisher for LogPublisher {
    async fn publish(&self, event: AccountCreated) -> Result<(), NotifyError> {
        info!(email = %event.email, "account_created notification (no webhook configured)");
        Ok(())
    }
}

/// Recording and failing publishers for tests
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingPublisher {
        events: Mutex<Vec<AccountCreated>>,
    }

    impl RecordingPublisher {
        pub fn events(&self) -> Vec<AccountCreated> { self.events.lock().unwrap().clone() }
    }

    #[async_trait]
    impl NotificationPublisher for RecordingPublisher {
        async fn publish(&self, event: AccountCreated) -> Result<(), NotifyError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    pub struct FailingPublisher;

    #[async_trait]
    impl NotificationPublisher for FailingPublisher {
        async fn publish(&self, _event: AccountCreated) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("injected failure".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_payload_shape() {
        let ev = AccountCreated { email: "foo@example.com".into(), first_name: "Foo".into() };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v, serde_json::json!({"email": "foo@example.com", "first_name": "Foo"}));
    }

    #[test]
    fn missing_webhook_falls_back_to_log_publisher() {
        let cfg = NotificationConfig { webhook_url: None, timeout_secs: 5 };
        assert!(from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn unreachable_webhook_reports_delivery_error() {
        let publisher = WebhookPublisher::new("http://127.0.0.1:9/hook", Duration::from_millis(200)).unwrap();
        let err = publisher
            .publish(AccountCreated { email: "a@b.co".into(), first_name: "A".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Delivery(_)));
    }
}
