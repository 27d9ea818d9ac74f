//! HTTP inbound adapter exposing the state endpoint and health probes.

pub mod endpoint;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;

pub use endpoint::{RUNNING_MESSAGE, dispatch, preflight, running};
pub use error::{ErrorStatus, envelope_response};
pub use health::{HealthState, live, ready};
pub use state::HttpState;
