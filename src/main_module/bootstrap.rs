//! Startup: logging, configuration and the storage backend.

use anyhow::Context;
use log::{info, warn};
use std::sync::Arc;

use crate::core::config::{AppConfig, StorageBackend};
use crate::core::shared::state::AppState;
use crate::core::shared::utils::{self, create_conn, redact_database_url, DbPool};
use crate::intake::store::{LeadStore, MemoryLeadStore, PgLeadStore};

/// `RUST_LOG` wins; otherwise `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Initialize database pool and run migrations
pub async fn init_database(config: &AppConfig) -> anyhow::Result<DbPool> {
    info!(
        "Connecting to database at {}",
        redact_database_url(&config.database.url)
    );
    let pool = create_conn(&config.database).context("Database pool creation failed")?;

    if config.database.run_migrations {
        info!("Running database migrations...");
        let migrate_pool = pool.clone();
        tokio::task::spawn_blocking(move || utils::run_migrations(&migrate_pool))
            .await
            .context("Migration task panicked")?
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
        info!("Database migrations completed successfully");
    }

    Ok(pool)
}

pub async fn create_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LeadStore>> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = init_database(config).await?;
            Ok(Arc::new(PgLeadStore::new(pool)))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory lead store; submissions are lost on restart");
            let store = MemoryLeadStore::new();
            let domain = &config.intake.default_domain;
            store.seed_brand("default", domain, domain, true).await;
            info!("Seeded in-memory brand for {}", domain);
            Ok(Arc::new(store))
        }
    }
}

pub async fn create_app_state(config: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let store = create_store(&config).await?;
    Ok(Arc::new(AppState::new(config, store)))
}
