//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only depend on
//! the [`StateEndpoint`] port, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::StateEndpoint;
use crate::inbound::http::error::ErrorStatus;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub endpoint: Arc<dyn StateEndpoint>,
    pub error_status: ErrorStatus,
}

impl HttpState {
    /// Construct state from the endpoint implementation.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use state_backend::domain::ports::FixtureStateEndpoint;
    /// use state_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureStateEndpoint));
    /// let _endpoint = state.endpoint.clone();
    /// ```
    pub fn new(endpoint: Arc<dyn StateEndpoint>) -> Self {
        Self {
            endpoint,
            error_status: ErrorStatus::default(),
        }
    }

    /// Choose how failed envelopes pick their status.
    #[must_use]
    pub fn with_error_status(mut self, error_status: ErrorStatus) -> Self {
        self.error_status = error_status;
        self
    }
}
