//! HTTP mapping for domain errors and response envelopes.
//!
//! Every non-empty request is answered with a JSON envelope. By default
//! failures keep the envelope body and pick a status from the error code.
//! [`ErrorStatus::AlwaysOk`] sends every envelope with 200 for clients that
//! only branch on `result`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::{Error, ErrorCode, ResponseEnvelope};

/// How failed envelopes choose their HTTP status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStatus {
    /// 400, 500 or 503 depending on the error code.
    #[default]
    ByCode,
    /// 200 for every envelope; only the body reports the failure.
    AlwaysOk,
}

impl ErrorStatus {
    /// Status to send for a failure that would otherwise use `status`.
    pub fn apply(self, status: StatusCode) -> StatusCode {
        match self {
            Self::ByCode => status,
            Self::AlwaysOk => StatusCode::OK,
        }
    }
}

/// Status for a failed request.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::MissingParameter | ErrorCode::UnknownOperation | ErrorCode::InvalidRequest => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::StoreUnavailable | ErrorCode::LockTimeout => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::EncodeFailure | ErrorCode::DecodeFailure | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

/// Render an envelope with the status its outcome and `policy` call for.
pub fn envelope_response(envelope: &ResponseEnvelope, policy: ErrorStatus) -> HttpResponse {
    match envelope {
        ResponseEnvelope::Failed(err) => {
            let mut response = err.error_response();
            *response.status_mut() = policy.apply(response.status());
            response
        }
        ResponseEnvelope::Saved | ResponseEnvelope::Loaded(_) => HttpResponse::Ok().json(envelope),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ResponseEnvelope::Failed(redact_if_internal(self)))
    }
}
