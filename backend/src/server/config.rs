//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use state_backend::config::DEFAULT_MAX_BODY_BYTES;
use state_backend::domain::lock::DEFAULT_LOCK_TIMEOUT;
use state_backend::domain::ports::TableStore;
use state_backend::inbound::http::ErrorStatus;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn TableStore>,
    pub(crate) lock_timeout: Duration,
    pub(crate) max_body_bytes: usize,
    pub(crate) error_status: ErrorStatus,
}

impl ServerConfig {
    /// Construct a configuration serving `store` on `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: Arc<dyn TableStore>) -> Self {
        Self {
            bind_addr,
            store,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            error_status: ErrorStatus::default(),
        }
    }

    /// Bound the wait for the store lock.
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Cap accepted request bodies.
    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Choose how failed envelopes pick their HTTP status.
    #[must_use]
    pub fn with_error_status(mut self, error_status: ErrorStatus) -> Self {
        self.error_status = error_status;
        self
    }
}
