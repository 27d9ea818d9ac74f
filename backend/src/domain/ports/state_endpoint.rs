//! Driving port for the single state endpoint.
//!
//! Inbound adapters hand the raw request body to this port and render the
//! outcome; they never see the store, the lock or the codec.

use async_trait::async_trait;

use crate::domain::envelope::{DispatchOutcome, ResponseEnvelope};

/// Domain use-case port that answers one request body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateEndpoint: Send + Sync {
    /// Answer `body`. Failures are reported inside the returned envelope.
    async fn dispatch(&self, body: &[u8]) -> DispatchOutcome;
}

/// Fixture endpoint that reports an empty store for every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStateEndpoint;

#[async_trait]
impl StateEndpoint for FixtureStateEndpoint {
    async fn dispatch(&self, body: &[u8]) -> DispatchOutcome {
        if body.trim_ascii().is_empty() {
            DispatchOutcome::Preflight
        } else {
            DispatchOutcome::Envelope(ResponseEnvelope::Loaded(None))
        }
    }
}
