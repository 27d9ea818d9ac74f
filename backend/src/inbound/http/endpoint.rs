//! Handlers for the single state endpoint at `/`.
//!
//! ```text
//! POST    /  {"type":"save","state":{..}}  -> {"result":"success"}
//! POST    /  {"type":"load"}               -> {"result":"success","data":..}
//! POST    /  (empty body)                  -> 200, empty body
//! OPTIONS /                                -> 200, empty body
//! GET     /                                -> plain-text running notice
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, post, route, web};
use tracing::warn;

use crate::domain::{DispatchOutcome, Error, ResponseEnvelope};
use crate::inbound::http::error::envelope_response;
use crate::inbound::http::schemas::{RequestEnvelopeSchema, ResponseEnvelopeSchema};
use crate::inbound::http::state::HttpState;

/// Body of the `GET /` running notice.
pub const RUNNING_MESSAGE: &str = "State backend is running. Use POST for data operations.";

fn empty_success() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::json()).finish()
}

/// Save or load the application state.
#[utoipa::path(
    post,
    path = "/",
    description = "Dispatch a save or load request. An empty body is answered \
                   with an empty 200 response and does not touch the store.",
    request_body(content = RequestEnvelopeSchema, content_type = "application/json"),
    responses(
        (status = 200, description = "Operation succeeded, or any failure when errors are sent as 200", body = ResponseEnvelopeSchema),
        (status = 400, description = "Missing parameter, unknown type or malformed body", body = ResponseEnvelopeSchema),
        (status = 500, description = "Store read or write failed", body = ResponseEnvelopeSchema),
        (status = 503, description = "Store unavailable or lock timed out", body = ResponseEnvelopeSchema)
    ),
    tags = ["state"],
    operation_id = "dispatchState"
)]
#[post("/")]
pub async fn dispatch(
    state: web::Data<HttpState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> HttpResponse {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            let status = err.as_response_error().status_code();
            warn!(error = %err, %status, "request body rejected");
            let envelope = ResponseEnvelope::Failed(Error::invalid_request(format!(
                "Unreadable request body: {err}"
            )));
            return HttpResponse::build(state.error_status.apply(status)).json(envelope);
        }
    };

    match state.endpoint.dispatch(&body).await {
        DispatchOutcome::Preflight => empty_success(),
        DispatchOutcome::Envelope(envelope) => envelope_response(&envelope, state.error_status),
    }
}

/// Answer a CORS pre-flight.
#[utoipa::path(
    options,
    path = "/",
    responses((status = 200, description = "Empty pre-flight response")),
    tags = ["state"],
    operation_id = "preflightState"
)]
#[route("/", method = "OPTIONS")]
pub async fn preflight() -> HttpResponse {
    empty_success()
}

/// Report that the service is up. Takes no lock.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = String, content_type = "text/plain")),
    tags = ["state"],
    operation_id = "stateRunning"
)]
#[get("/")]
pub async fn running() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(RUNNING_MESSAGE)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{FixtureStateEndpoint, MockStateEndpoint};
    use crate::inbound::http::error::ErrorStatus;
    use actix_web::http::{Method, StatusCode, header};
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    fn app_state(endpoint: Arc<dyn crate::domain::ports::StateEndpoint>) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(endpoint))
    }

    #[actix_web::test]
    async fn empty_post_is_an_empty_json_success() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(Arc::new(FixtureStateEndpoint)))
                .service(dispatch),
        )
        .await;

        let request = actix_test::TestRequest::post().uri("/").to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(b"application/json".as_slice())
        );
        let body = actix_test::read_body(response).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn envelope_errors_carry_their_status() {
        let mut endpoint = MockStateEndpoint::new();
        endpoint.expect_dispatch().times(1).return_once(|_| {
            DispatchOutcome::Envelope(ResponseEnvelope::Failed(Error::store_unavailable(
                "Backing store unavailable",
            )))
        });
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(Arc::new(endpoint)))
                .service(dispatch),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/")
            .set_payload(r#"{"type":"load"}"#)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code"), Some(&json!("store_unavailable")));
    }

    #[actix_web::test]
    async fn errors_can_be_sent_as_ok() {
        let mut endpoint = MockStateEndpoint::new();
        endpoint.expect_dispatch().times(1).return_once(|_| {
            DispatchOutcome::Envelope(ResponseEnvelope::Failed(Error::unknown_operation("drop")))
        });
        let state = HttpState::new(Arc::new(endpoint)).with_error_status(ErrorStatus::AlwaysOk);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(dispatch),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/")
            .set_payload(r#"{"type":"drop"}"#)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("result"), Some(&json!("error")));
        assert_eq!(body.get("code"), Some(&json!("unknown_operation")));
    }

    #[actix_web::test]
    async fn oversized_bodies_are_ok_when_errors_are_sent_as_ok() {
        let state =
            HttpState::new(Arc::new(FixtureStateEndpoint)).with_error_status(ErrorStatus::AlwaysOk);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::PayloadConfig::new(8))
                .service(dispatch),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/")
            .set_payload(r#"{"type":"load","padding":"xxxxxxxx"}"#)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code"), Some(&json!("invalid_request")));
    }

    #[actix_web::test]
    async fn body_is_forwarded_verbatim() {
        let mut endpoint = MockStateEndpoint::new();
        endpoint
            .expect_dispatch()
            .withf(|body| body == br#"{"type":"load"}"#)
            .times(1)
            .return_once(|_| DispatchOutcome::Envelope(ResponseEnvelope::Loaded(None)));
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(Arc::new(endpoint)))
                .service(dispatch),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/")
            .set_payload(r#"{"type":"load"}"#)
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(body, json!({"result": "success", "data": null}));
    }

    #[actix_web::test]
    async fn oversized_bodies_are_rejected_with_an_envelope() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(Arc::new(FixtureStateEndpoint)))
                .app_data(web::PayloadConfig::new(8))
                .service(dispatch),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/")
            .set_payload(r#"{"type":"load","padding":"xxxxxxxx"}"#)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body.get("code"), Some(&json!("invalid_request")));
    }

    #[actix_web::test]
    async fn options_is_an_empty_success() {
        let app = actix_test::init_service(App::new().service(preflight)).await;
        let request = actix_test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(actix_test::read_body(response).await.is_empty());
    }

    #[actix_web::test]
    async fn get_reports_running() {
        let app = actix_test::init_service(App::new().service(running)).await;
        let request = actix_test::TestRequest::get().uri("/").to_request();
        let body = actix_test::call_and_read_body(&app, request).await;
        assert_eq!(body.as_ref(), RUNNING_MESSAGE.as_bytes());
    }
}
