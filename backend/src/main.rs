//! Backend entry-point: loads settings, selects the table store and serves
//! the state endpoint.

mod server;

use ortho_config::OrthoConfig;
use state_backend::config::ServerSettings;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, build_table_store, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let store = build_table_store(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr(), store)
        .with_lock_timeout(settings.lock_timeout())
        .with_max_body_bytes(settings.max_body_bytes())
        .with_error_status(settings.error_status());

    info!(bind_addr = %settings.bind_addr(), "starting state backend");
    create_server(config)?.await
}
