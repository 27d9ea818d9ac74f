//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the state endpoint, the health probes and the schema
//! wrappers from [`crate::inbound::http::schemas`]. Swagger UI serves it in
//! debug builds and `cargo run --bin openapi-dump` prints it.

use crate::inbound::http::schemas::{
    ApplicationStateSchema, ErrorCodeSchema, RequestEnvelopeSchema, ResponseEnvelopeSchema,
    ResultKindSchema, UserSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "State backend API",
        description = "Single-endpoint persistence for the application state document."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::endpoint::dispatch,
        crate::inbound::http::endpoint::preflight,
        crate::inbound::http::endpoint::running,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RequestEnvelopeSchema,
        ResponseEnvelopeSchema,
        ApplicationStateSchema,
        UserSchema,
        ErrorCodeSchema,
        ResultKindSchema
    )),
    tags(
        (name = "state", description = "Saving and loading the state document"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
