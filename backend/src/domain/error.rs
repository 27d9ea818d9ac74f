//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to a
//! status code and renders them inside the response envelope.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A required request field is absent, null or empty.
    MissingParameter,
    /// The request names an operation the service does not know.
    UnknownOperation,
    /// The backing store cannot be reached.
    StoreUnavailable,
    /// The store lock was not acquired within its bound.
    LockTimeout,
    /// Writing the state to the store failed.
    EncodeFailure,
    /// Reading the state from the store failed.
    DecodeFailure,
    /// The request body is not a readable envelope.
    InvalidRequest,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::MissingParameter => "Missing parameter",
            Self::UnknownOperation => "Unknown operation",
            Self::StoreUnavailable => "Backing store unavailable",
            Self::LockTimeout => "Timed out waiting for the store lock",
            Self::EncodeFailure => "Failed to save state",
            Self::DecodeFailure => "Failed to load state",
            Self::InvalidRequest => "Invalid request",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use state_backend::domain::{Error, ErrorCode};
///
/// let err = Error::missing_parameter("type");
/// assert_eq!(err.code(), ErrorCode::MissingParameter);
/// assert_eq!(err.message(), "Missing parameter: type");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

/// Validation errors emitted by [`Error::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error. A blank message is replaced by a generic one for
    /// the code.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self {
            code,
            message: code.fallback_message().to_owned(),
        })
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self { code, message })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// A required request field is missing.
    pub fn missing_parameter(name: &str) -> Self {
        Self::new(ErrorCode::MissingParameter, format!("Missing parameter: {name}"))
    }

    /// The request names an unsupported operation.
    pub fn unknown_operation(name: &str) -> Self {
        Self::new(ErrorCode::UnknownOperation, format!("Unknown type: {name}"))
    }

    /// The backing store cannot be reached.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// The store lock was not acquired within `waited`.
    pub fn lock_timeout(waited: Duration) -> Self {
        Self::new(
            ErrorCode::LockTimeout,
            format!("Could not acquire the store lock within {} ms", waited.as_millis()),
        )
    }

    /// Saving failed.
    pub fn encode_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EncodeFailure, message)
    }

    /// Loading failed.
    pub fn decode_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecodeFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        Error::try_new(value.code, value.message)
    }
}
