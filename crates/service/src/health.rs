//! Liveness probe that proves the relational store accepts writes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::errors::{RepositoryError, ServiceError};
use crate::request::RequestEnvelope;
use crate::response::Outcome;
use crate::validation;

#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Insert one `health_checks` row.
    async fn record_check(&self) -> Result<(), RepositoryError>;
}

pub struct HealthService {
    repo: Arc<dyn HealthRepository>,
}

impl HealthService {
    pub fn new(repo: Arc<dyn HealthRepository>) -> Self { Self { repo } }

    /// Any store failure, constraint or not, reports the service as unavailable.
    pub async fn check(&self, env: &RequestEnvelope) -> Result<Outcome<()>, ServiceError> {
        validation::check_read(env)?;
        if let Err(e) = self.repo.record_check().await {
            warn!(error = %e, "health check insert failed");
            return Err(ServiceError::StoreUnavailable(e.to_string()));
        }
        Ok(Outcome::Ok(()))
    }
}
