//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `STATE_BACKEND_*` environment variables and
//! configuration files, in increasing order of precedence for the former.
//! Every field is optional; accessors supply the defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::lock::DEFAULT_LOCK_TIMEOUT;
use crate::inbound::http::ErrorStatus;
use crate::outbound::persistence::DEFAULT_POOL_MAX_SIZE;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);
/// Default request body limit: 10 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Configuration values controlling the HTTP server and its store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STATE_BACKEND")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL. Without one the state is kept in memory.
    pub database_url: Option<String>,
    /// Seconds a request may wait for the store lock.
    pub lock_timeout_secs: Option<u64>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: Option<usize>,
    /// Send failed envelopes with status 200.
    pub errors_as_ok: Option<bool>,
}

impl ServerSettings {
    /// Listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Store lock bound.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout_secs
            .map_or(DEFAULT_LOCK_TIMEOUT, Duration::from_secs)
    }

    /// Pool size, falling back to the persistence default.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Request body limit.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    /// Status policy for failed envelopes. Statuses follow the error code
    /// unless `errors_as_ok` is set.
    pub fn error_status(&self) -> ErrorStatus {
        if self.errors_as_ok.unwrap_or(false) {
            ErrorStatus::AlwaysOk
        } else {
            ErrorStatus::ByCode
        }
    }
}
