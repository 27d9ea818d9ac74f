//! Selection of the table store adapter from settings.

use std::sync::Arc;

use state_backend::config::ServerSettings;
use state_backend::domain::ports::TableStore;
use state_backend::outbound::memory::InMemoryTableStore;
use state_backend::outbound::persistence::{DbPool, DieselTableStore, PoolConfig, run_migrations};
use tracing::{info, warn};

/// Build the configured table store.
///
/// With a database URL the schema is migrated and a lazy pool is created;
/// otherwise state lives in memory and is lost on exit.
///
/// # Errors
/// Returns [`std::io::Error`] when migrations fail or the pool cannot be
/// built.
pub async fn build_table_store(settings: &ServerSettings) -> std::io::Result<Arc<dyn TableStore>> {
    let Some(url) = settings.database_url() else {
        warn!("no database URL configured; state is kept in memory only");
        return Ok(Arc::new(InMemoryTableStore::new()));
    };

    run_migrations(url).await.map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(std::io::Error::other)?;
    info!(pool_max_size = settings.pool_max_size(), "using PostgreSQL table store");
    Ok(Arc::new(DieselTableStore::new(pool)))
}
