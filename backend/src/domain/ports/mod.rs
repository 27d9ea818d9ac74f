//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod state_endpoint;
mod table_store;

#[cfg(test)]
pub use state_endpoint::MockStateEndpoint;
pub use state_endpoint::{FixtureStateEndpoint, StateEndpoint};
#[cfg(test)]
pub use table_store::MockTableStore;
pub use table_store::{TableStore, TableStoreError};
