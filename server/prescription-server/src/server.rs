use crate::config::ServerConfig;
use anyhow::{Context, Result};
use auth_identity::{IdentityConfig, PasswordHasher, TokenService, DEFAULT_JWT_SECRET};
use database_layer::{
    DatabasePool, InMemoryPrescriptionStore, PgPrescriptionStore, PrescriptionStore,
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct PrescriptionServer {
    /// Record access layer
    pub store: Arc<dyn PrescriptionStore>,
    pub passwords: PasswordHasher,
    pub tokens: Arc<TokenService>,
    pub started_at: Instant,
}

impl PrescriptionServer {
    pub fn new(store: Arc<dyn PrescriptionStore>, identity: &IdentityConfig) -> Self {
        Self {
            store,
            passwords: PasswordHasher::new(),
            tokens: Arc::new(TokenService::new(identity)),
            started_at: Instant::now(),
        }
    }

    /// Build state from configuration: Postgres when a URL is configured,
    /// otherwise an in-memory store.
    pub async fn from_config(config: &ServerConfig, force_in_memory: bool) -> Result<Self> {
        if config.identity.jwt_secret.expose_secret() == DEFAULT_JWT_SECRET {
            warn!(
                "identity.jwt_secret is the built-in placeholder; \
                 set PRESCRIPTION__IDENTITY__JWT_SECRET"
            );
        }

        let store: Arc<dyn PrescriptionStore> = match (&config.database.url, force_in_memory) {
            (Some(url), false) => {
                let pool = DatabasePool::new(url, config.database.max_connections)
                    .await
                    .context("failed to connect to the database")?;
                if config.database.run_migrations {
                    pool.migrate().await.context("failed to apply migrations")?;
                }
                Arc::new(PgPrescriptionStore::new(pool))
            }
            _ => {
                warn!("No database configured; records are kept in memory and lost on exit");
                Arc::new(InMemoryPrescriptionStore::new())
            }
        };

        info!("Server state initialized");
        Ok(Self::new(store, &config.identity))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
