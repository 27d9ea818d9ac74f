//! Request dispatcher implementing the [`StateEndpoint`] driving port.
//!
//! Order of checks for a non-empty body:
//! 1. acquire the store lock;
//! 2. parse the body as JSON;
//! 3. require `type`;
//! 4. confirm the store is reachable;
//! 5. resolve `type` to `save` or `load`;
//! 6. run the operation through the codec.
//!
//! The lock guard lives until the response is built, so it is released on
//! every path including early returns.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::codec::{TableSnapshot, decode_state, encode_state};
use crate::domain::envelope::{DispatchOutcome, Operation, RequestEnvelope, ResponseEnvelope};
use crate::domain::lock::StoreLock;
use crate::domain::ports::{StateEndpoint, TableStore, TableStoreError};
use crate::domain::state::ApplicationState;
use crate::domain::tables::{Table, TableName};
use crate::domain::Error;

/// Serialises saves and loads against one table store.
pub struct Dispatcher<S: ?Sized> {
    store: Arc<S>,
    lock: StoreLock,
}

impl<S: ?Sized> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lock: self.lock.clone(),
        }
    }
}

impl<S: ?Sized> Dispatcher<S> {
    /// Create a dispatcher over `store`, guarded by `lock`.
    pub fn new(store: Arc<S>, lock: StoreLock) -> Self {
        Self { store, lock }
    }
}

impl<S> Dispatcher<S>
where
    S: TableStore + ?Sized,
{
    fn map_availability_error(error: TableStoreError) -> Error {
        Error::store_unavailable(format!("Backing store unavailable: {error}"))
    }

    fn map_write_error(error: TableStoreError) -> Error {
        Error::encode_failure(format!("Failed to save state: {error}"))
    }

    fn map_read_error(error: TableStoreError) -> Error {
        Error::decode_failure(format!("Failed to load state: {error}"))
    }

    async fn handle(&self, body: &[u8]) -> Result<ResponseEnvelope, Error> {
        let _guard = self
            .lock
            .acquire()
            .await
            .map_err(|timeout| Error::lock_timeout(timeout.waited))?;

        let request = RequestEnvelope::parse(body)?;
        let name = request.operation_name()?;
        self.store
            .ensure_available()
            .await
            .map_err(Self::map_availability_error)?;

        match Operation::parse(&name)? {
            Operation::Save => {
                let state = request.state()?;
                self.save(&state).await?;
                Ok(ResponseEnvelope::Saved)
            }
            Operation::Load => self.load().await.map(ResponseEnvelope::Loaded),
        }
    }

    async fn save(&self, state: &ApplicationState) -> Result<(), Error> {
        let encoded = encode_state(state)
            .map_err(|err| Error::encode_failure(format!("Failed to encode state: {err}")))?;
        for (name, table) in encoded.into_tables() {
            self.store
                .replace_table(name, &table)
                .await
                .map_err(Self::map_write_error)?;
            debug!(table = %name, rows = table.rows().len(), "table rewritten");
        }
        Ok(())
    }

    async fn load(&self) -> Result<Option<ApplicationState>, Error> {
        let snapshot = TableSnapshot {
            users: self.read(TableName::Users).await?,
            properties: self.read(TableName::Properties).await?,
            masters: self.read(TableName::Masters).await?,
        };
        let report = decode_state(snapshot);
        for failure in &report.field_failures {
            warn!(error = %failure, "stored field recovered during load");
        }
        Ok(report.state)
    }

    async fn read(&self, name: TableName) -> Result<Option<Table>, Error> {
        self.store
            .read_table(name)
            .await
            .map_err(Self::map_read_error)
    }
}

#[async_trait]
impl<S> StateEndpoint for Dispatcher<S>
where
    S: TableStore + ?Sized,
{
    async fn dispatch(&self, body: &[u8]) -> DispatchOutcome {
        if body.trim_ascii().is_empty() {
            debug!("empty body answered as pre-flight");
            return DispatchOutcome::Preflight;
        }

        let started = Instant::now();
        let envelope = self.handle(body).await.unwrap_or_else(ResponseEnvelope::from);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &envelope {
            ResponseEnvelope::Failed(err) => {
                warn!(code = ?err.code(), error = %err, elapsed_ms, "state request failed");
            }
            ResponseEnvelope::Saved => info!(operation = "save", elapsed_ms, "state saved"),
            ResponseEnvelope::Loaded(state) => info!(
                operation = "load",
                empty = state.is_none(),
                elapsed_ms,
                "state loaded"
            ),
        }
        DispatchOutcome::Envelope(envelope)
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
