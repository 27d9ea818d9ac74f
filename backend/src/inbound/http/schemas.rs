//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their JSON shape for documentation only.

use serde_json::Value;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// `type` or `state` is absent, null or empty.
    #[schema(rename = "missing_parameter")]
    MissingParameter,
    /// `type` is neither `save` nor `load`.
    #[schema(rename = "unknown_operation")]
    UnknownOperation,
    /// The backing store cannot be reached.
    #[schema(rename = "store_unavailable")]
    StoreUnavailable,
    /// The store lock was not acquired in time.
    #[schema(rename = "lock_timeout")]
    LockTimeout,
    /// Writing the state failed.
    #[schema(rename = "encode_failure")]
    EncodeFailure,
    /// Reading the state failed.
    #[schema(rename = "decode_failure")]
    DecodeFailure,
    /// The body is not JSON or `state` is not a readable state.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// An unexpected server failure.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Outcome marker of a response envelope.
#[derive(ToSchema)]
#[schema(as = ResultKind)]
pub enum ResultKindSchema {
    #[schema(rename = "success")]
    Success,
    #[schema(rename = "error")]
    Error,
}

/// OpenAPI schema for [`crate::domain::User`].
///
/// Unknown fields are kept and returned as sent.
#[derive(ToSchema)]
#[schema(as = User)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserSchema {
    /// Client-assigned identifier, string or number.
    #[schema(value_type = Object, example = "u1")]
    id: Value,
    /// Usually a string; other JSON values are stored as sent.
    #[schema(value_type = Object, example = "Aki")]
    name: Value,
    /// Empty when not set.
    #[schema(value_type = Object)]
    pass: Value,
    /// Defaults to `user`.
    #[schema(value_type = Object, example = "user")]
    role: Value,
}

/// OpenAPI schema for [`crate::domain::ApplicationState`].
#[derive(ToSchema)]
#[schema(as = ApplicationState, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ApplicationStateSchema {
    master_users: Vec<UserSchema>,
    /// Opaque property records; each is a JSON object.
    #[schema(value_type = Vec<Object>)]
    properties: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    master_l1: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    master_l2: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    master_l3: Vec<Value>,
    #[schema(value_type = Vec<Object>)]
    master_properties: Vec<Value>,
    #[schema(example = "2026-01-01")]
    view_start: Option<String>,
    view_end: Option<String>,
    /// Positive display zoom; defaults to 1.0.
    #[schema(example = 1.0)]
    zoom: f64,
    /// Set of collapsed node identifiers.
    #[schema(value_type = Vec<Object>)]
    collapsed_ids: Vec<Value>,
    cloud_url: String,
    last_sync: Option<String>,
    /// Defaults to `users`.
    #[schema(example = "users")]
    master_tab: String,
}

/// Request body for `POST /`.
#[derive(ToSchema)]
#[schema(as = RequestEnvelope)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RequestEnvelopeSchema {
    /// `save` or `load`.
    #[schema(rename = "type", example = "save")]
    operation: String,
    /// Required for `save`.
    state: Option<ApplicationStateSchema>,
}

/// Response body for `POST /`.
#[derive(ToSchema)]
#[schema(as = ResponseEnvelope)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ResponseEnvelopeSchema {
    result: ResultKindSchema,
    /// Present on load; null when nothing has been saved.
    data: Option<ApplicationStateSchema>,
    /// Present on failure.
    #[schema(example = "Missing parameter: type")]
    error: Option<String>,
    /// Present on failure.
    code: Option<ErrorCodeSchema>,
}
