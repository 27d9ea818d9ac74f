//! Request and response envelopes exchanged with clients.
//!
//! Requests are JSON objects of the form `{"type": "save" | "load", "state"?}`.
//! Responses are `{"result": "success", "data"?}` or
//! `{"result": "error", "error": <message>, "code": <ErrorCode>}`.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::error::{Error, ErrorCode};
use super::state::ApplicationState;

/// Operations accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Replace the stored state.
    Save,
    /// Read the stored state back.
    Load,
}

impl Operation {
    /// Name used in the request `type` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Load => "load",
        }
    }

    /// Resolve an operation name.
    ///
    /// # Errors
    /// Returns an [`ErrorCode::UnknownOperation`] error naming `name` when
    /// it is neither `save` nor `load`.
    pub fn parse(name: &str) -> Result<Self, Error> {
        match name {
            "save" => Ok(Self::Save),
            "load" => Ok(Self::Load),
            other => Err(Error::unknown_operation(other)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed request body.
///
/// Any JSON value is accepted; fields are looked up only when the body is an
/// object, so `[]` or `"save"` read as a request without a `type`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    fields: Map<String, Value>,
}

impl RequestEnvelope {
    /// Parse a request body.
    ///
    /// # Errors
    /// Returns an [`ErrorCode::InvalidRequest`] error carrying the parser's
    /// description when `body` is not JSON.
    ///
    /// # Examples
    /// ```
    /// use state_backend::domain::envelope::RequestEnvelope;
    ///
    /// let request = RequestEnvelope::parse(br#"{"type":"load"}"#).expect("valid JSON");
    /// assert_eq!(request.operation_name().expect("type present"), "load");
    /// ```
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| Error::invalid_request(format!("Invalid JSON: {err}")))?;
        let fields = match value {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        Ok(Self { fields })
    }

    /// The `type` field rendered as text.
    ///
    /// # Errors
    /// Returns a missing-parameter error when `type` is absent, null or empty.
    pub fn operation_name(&self) -> Result<String, Error> {
        match self.fields.get("type") {
            None | Some(Value::Null) => Err(Error::missing_parameter("type")),
            Some(Value::String(name)) if name.is_empty() => Err(Error::missing_parameter("type")),
            Some(Value::String(name)) => Ok(name.clone()),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// Deserialize the `state` field.
    ///
    /// # Errors
    /// Returns a missing-parameter error when `state` is absent or null, and
    /// an [`ErrorCode::InvalidRequest`] error when it is not a readable state.
    pub fn state(&self) -> Result<ApplicationState, Error> {
        match self.fields.get("state") {
            None | Some(Value::Null) => Err(Error::missing_parameter("state")),
            Some(raw) => ApplicationState::deserialize(raw)
                .map_err(|err| Error::invalid_request(format!("Invalid state: {err}"))),
        }
    }
}

/// Reply to a non-empty request.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// A save completed.
    Saved,
    /// A load completed; `None` means nothing has been saved.
    Loaded(Option<ApplicationState>),
    /// The request failed.
    Failed(Error),
}

impl ResponseEnvelope {
    /// Error code of a failed response.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Failed(err) => Some(err.code()),
            Self::Saved | Self::Loaded(_) => None,
        }
    }

    /// Whether the response reports success.
    pub fn is_success(&self) -> bool {
        self.error_code().is_none()
    }
}

impl From<Error> for ResponseEnvelope {
    fn from(value: Error) -> Self {
        Self::Failed(value)
    }
}

#[derive(Serialize)]
struct ResponseEnvelopeDto<'a> {
    result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Option<&'a ApplicationState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let dto = match self {
            Self::Saved => ResponseEnvelopeDto {
                result: "success",
                data: None,
                error: None,
                code: None,
            },
            Self::Loaded(state) => ResponseEnvelopeDto {
                result: "success",
                data: Some(state.as_ref()),
                error: None,
                code: None,
            },
            Self::Failed(err) => ResponseEnvelopeDto {
                result: "error",
                data: None,
                error: Some(err.message()),
                code: Some(err.code()),
            },
        };
        dto.serialize(serializer)
    }
}

/// Result of dispatching one request body.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The body was empty: answer with an empty success and touch nothing.
    Preflight,
    /// A full response envelope.
    Envelope(ResponseEnvelope),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn saved_envelope_has_no_data_field() {
        let value = serde_json::to_value(ResponseEnvelope::Saved).expect("serialise");
        assert_eq!(value, json!({"result": "success"}));
    }

    #[rstest]
    fn empty_load_carries_explicit_null() {
        let value = serde_json::to_value(ResponseEnvelope::Loaded(None)).expect("serialise");
        assert_eq!(value, json!({"result": "success", "data": null}));
    }

    #[rstest]
    fn failures_carry_message_and_code() {
        let envelope = ResponseEnvelope::from(Error::missing_parameter("state"));
        let value = serde_json::to_value(&envelope).expect("serialise");
        assert_eq!(
            value,
            json!({
                "result": "error",
                "error": "Missing parameter: state",
                "code": "missing_parameter"
            })
        );
        assert!(!envelope.is_success());
    }

    #[rstest]
    #[case(br#"{}"#.as_slice())]
    #[case(br#"{"type": null}"#.as_slice())]
    #[case(br#"{"type": ""}"#.as_slice())]
    #[case(br#"[1, 2]"#.as_slice())]
    fn missing_type_is_reported(#[case] body: &[u8]) {
        let request = RequestEnvelope::parse(body).expect("valid JSON");
        let err = request.operation_name().expect_err("type missing");
        assert_eq!(err.code(), ErrorCode::MissingParameter);
    }

    #[rstest]
    fn non_string_type_is_rendered_for_the_unknown_operation_message() {
        let request = RequestEnvelope::parse(br#"{"type": 7}"#).expect("valid JSON");
        let name = request.operation_name().expect("type present");
        let err = Operation::parse(&name).expect_err("not an operation");
        assert_eq!(err.message(), "Unknown type: 7");
    }

    #[rstest]
    fn malformed_json_is_an_invalid_request() {
        let err = RequestEnvelope::parse(b"{type: save").expect_err("not JSON");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().starts_with("Invalid JSON"));
    }

    #[rstest]
    #[case(br#"{"type": "save"}"#.as_slice())]
    #[case(br#"{"type": "save", "state": null}"#.as_slice())]
    fn absent_state_is_a_missing_parameter(#[case] body: &[u8]) {
        let request = RequestEnvelope::parse(body).expect("valid JSON");
        let err = request.state().expect_err("state missing");
        assert_eq!(err.message(), "Missing parameter: state");
    }

    #[rstest]
    fn unreadable_state_is_an_invalid_request() {
        let request =
            RequestEnvelope::parse(br#"{"type": "save", "state": {"masterUsers": 5}}"#)
                .expect("valid JSON");
        let err = request.state().expect_err("bad state");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case("save", Operation::Save)]
    #[case("load", Operation::Load)]
    fn known_operations_parse(#[case] name: &str, #[case] expected: Operation) {
        assert_eq!(Operation::parse(name).expect("known"), expected);
    }
}
