use std::{net::SocketAddr, sync::Arc};

use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::auth::Argon2Hasher;
use service::repo::SeaOrmRepository;
use service::{blob, notify};

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Wire production collaborators from configuration.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await.map_err(anyhow::Error::from)?;
    info!(event = "migrations_applied", "database schema up to date");

    let repo = Arc::new(SeaOrmRepository::new(db));
    let blobs = blob::from_config(&cfg.blob).await?;
    let notifier = notify::from_config(&cfg.notification)?;
    Ok(AppState::new(repo, blobs, notifier, Arc::new(Argon2Hasher)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr = bind_addr(&cfg)?;
    let state = build_state(&cfg).await?;
    let app = routes::build_router(state, cfg.server.max_upload_bytes);

    info!(%addr, "starting catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_bad_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_from_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8080);
    }
}
