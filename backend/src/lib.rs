//! State backend library modules.
//!
//! A single HTTP endpoint saves and loads one application state document,
//! persisted as three fixed tables behind the [`domain::ports::TableStore`]
//! port.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
