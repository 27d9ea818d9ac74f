//! Domain model, codec and use cases of the state backend.
//!
//! Purpose: keep everything that decides *what* is stored and *how* it is
//! laid out in tables free of transport and database concerns. Inbound
//! adapters talk to [`ports::StateEndpoint`]; outbound adapters implement
//! [`ports::TableStore`].
//!
//! Public surface:
//! - ApplicationState, User, Property, CollapsedIds: the persisted state.
//! - Error, ErrorCode: request failures reported in the response envelope.
//! - Dispatcher: the `StateEndpoint` implementation.

pub mod codec;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod lock;
pub mod ports;
pub mod state;
pub mod tables;

pub use self::dispatcher::Dispatcher;
pub use self::envelope::{DispatchOutcome, Operation, RequestEnvelope, ResponseEnvelope};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::lock::{StoreLock, StoreLockGuard};
pub use self::state::{ApplicationState, CollapsedIds, Property, User};
