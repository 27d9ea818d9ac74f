//! Shared helpers for the HTTP integration suites.
//!
//! Apps are assembled from library pieces over an [`InMemoryTableStore`], so
//! every suite exercises the real dispatcher, codec and middleware.

#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};
use state_backend::Trace;
use state_backend::domain::{Dispatcher, StoreLock};
use state_backend::inbound::http::{HttpState, dispatch, preflight, running};
use state_backend::outbound::memory::InMemoryTableStore;

/// Store and lock shared by one test app.
#[derive(Clone)]
pub struct Harness {
    pub store: InMemoryTableStore,
    pub lock: StoreLock,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_lock_timeout(Duration::from_secs(5))
    }

    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            store: InMemoryTableStore::new(),
            lock: StoreLock::new(timeout),
        }
    }

    pub fn http_state(&self) -> web::Data<HttpState> {
        let dispatcher = Dispatcher::new(Arc::new(self.store.clone()), self.lock.clone());
        web::Data::new(HttpState::new(Arc::new(dispatcher)))
    }

    /// Initialise an app serving the state endpoint.
    pub async fn app(
        &self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(self.http_state())
                .wrap(Trace)
                .service(dispatch)
                .service(preflight)
                .service(running),
        )
        .await
    }
}

/// POST `body` to `/` and return the status with the decoded JSON body.
pub async fn post_json<S, B>(app: &S, body: impl Into<String>) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload(body.into())
        .to_request();
    let res = test::call_service(app, req).await;
    let status = res.status().as_u16();
    let bytes = test::read_body(res).await;
    let value = serde_json::from_slice(&bytes).expect("response body is JSON");
    (status, value)
}

/// Save `state` and assert success.
pub async fn save<S, B>(app: &S, state: &Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let body = json!({"type": "save", "state": state}).to_string();
    let (status, value) = post_json(app, body).await;
    assert_eq!(status, 200, "save failed: {value}");
    assert_eq!(value, json!({"result": "success"}));
}

/// Load and return the `data` member of a successful response.
pub async fn load<S, B>(app: &S) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, value) = post_json(app, r#"{"type":"load"}"#).await;
    assert_eq!(status, 200, "load failed: {value}");
    assert_eq!(value["result"], "success");
    value
        .get("data")
        .cloned()
        .expect("load responses carry a data member")
}

/// A state touching every field.
pub fn full_state() -> Value {
    json!({
        "masterUsers": [
            {"id": "u1", "name": "Aki", "pass": "pw", "role": "admin", "team": "north"},
            {"id": 2, "name": "Bo", "pass": "", "role": "user"}
        ],
        "properties": [
            {"id": "p1", "name": "Harbour Lofts", "units": 12, "tags": ["a", "b"]},
            {"id": "p2", "nested": {"floor": 3}}
        ],
        "masterL1": [{"id": "l1", "label": "Region"}],
        "masterL2": [{"id": "l2", "parent": "l1"}],
        "masterL3": [],
        "masterProperties": [{"id": "mp1"}],
        "viewStart": "2026-01-01",
        "viewEnd": "2026-03-31",
        "zoom": 1.5,
        "collapsedIds": ["l1", 7],
        "cloudUrl": "https://example.invalid/state",
        "lastSync": "2026-02-01T10:00:00Z",
        "masterTab": "properties"
    })
}
