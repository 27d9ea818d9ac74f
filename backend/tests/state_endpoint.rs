//! End-to-end behaviour of the state endpoint over the in-memory store.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};
use state_backend::domain::ApplicationState;
use state_backend::domain::tables::TableName;
use state_backend::domain::ports::TableStore;
use state_backend::inbound::http::RUNNING_MESSAGE;

use support::{Harness, full_state, load, post_json, save};

fn as_state(value: Value) -> ApplicationState {
    serde_json::from_value(value).expect("value is a state")
}

#[rstest]
#[actix_web::test]
async fn saved_state_loads_back_unchanged() {
    let harness = Harness::new();
    let app = harness.app().await;

    save(&app, &full_state()).await;
    let loaded = load(&app).await;

    assert_eq!(as_state(loaded.clone()), as_state(full_state()));
    assert_eq!(loaded["masterUsers"][0]["team"], "north");
    assert_eq!(loaded["properties"][1]["nested"]["floor"], 3);
}

#[rstest]
#[actix_web::test]
async fn numeric_user_fields_load_back_verbatim() {
    let harness = Harness::new();
    let app = harness.app().await;
    let users = json!([
        {"id": 3, "name": 42, "pass": 1234, "role": "admin", "badge": 7},
        {"id": "u4", "name": "Dee", "pass": 0}
    ]);

    save(&app, &json!({"masterUsers": users})).await;
    let loaded = load(&app).await;

    assert_eq!(loaded["masterUsers"][0], users[0]);
    assert_eq!(loaded["masterUsers"][1]["pass"], 0);
    assert_eq!(loaded["masterUsers"][1]["role"], "user");
}

#[rstest]
#[case::serialised_set(json!({}))]
#[case::text(json!("l1"))]
#[case::null(Value::Null)]
#[actix_web::test]
async fn non_array_collapsed_ids_save_as_empty(#[case] collapsed: Value) {
    let harness = Harness::new();
    let app = harness.app().await;

    let state = json!({"masterUsers": [{"id": "u1", "name": "Aki"}], "collapsedIds": collapsed});
    save(&app, &state).await;
    let loaded = load(&app).await;

    assert_eq!(loaded["collapsedIds"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn saving_twice_is_idempotent() {
    let harness = Harness::new();
    let app = harness.app().await;

    save(&app, &full_state()).await;
    let first = harness.store.read_table(TableName::Users).await.expect("read");
    save(&app, &full_state()).await;
    let second = harness.store.read_table(TableName::Users).await.expect("read");

    assert_eq!(first, second);
    assert_eq!(as_state(load(&app).await), as_state(full_state()));
}

#[rstest]
#[actix_web::test]
async fn smaller_save_replaces_earlier_rows() {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    save(&app, &json!({"masterUsers": [{"id": "u9", "name": "Cy"}]})).await;
    let loaded = load(&app).await;

    assert_eq!(loaded["masterUsers"].as_array().map(Vec::len), Some(1));
    assert_eq!(loaded["properties"], json!([]));
    assert_eq!(loaded["zoom"], json!(1.0));
}

#[rstest]
#[case::never_saved(None)]
#[case::saved_empty(Some(json!({"masterUsers": [], "properties": [], "zoom": 2.0})))]
#[actix_web::test]
async fn empty_store_loads_as_null(#[case] saved: Option<Value>) {
    let harness = Harness::new();
    let app = harness.app().await;
    if let Some(state) = saved {
        save(&app, &state).await;
    }

    assert_eq!(load(&app).await, Value::Null);
}

#[rstest]
#[case(r#"{"state":{}}"#, 400, "missing_parameter")]
#[case(r#"{"type":"save"}"#, 400, "missing_parameter")]
#[case(r#"{"type":"archive"}"#, 400, "unknown_operation")]
#[case(r#"{"type":"save","state":{"properties":"x"}}"#, 400, "invalid_request")]
#[case("{not json", 400, "invalid_request")]
#[actix_web::test]
async fn rejected_requests_use_the_error_envelope(
    #[case] body: &str,
    #[case] status: u16,
    #[case] code: &str,
) {
    let harness = Harness::new();
    let app = harness.app().await;

    let (actual_status, value) = post_json(&app, body).await;

    assert_eq!(actual_status, status);
    assert_eq!(value["result"], "error");
    assert_eq!(value["code"], code);
    assert!(value["error"].as_str().is_some_and(|msg| !msg.is_empty()));
}

#[rstest]
#[actix_web::test]
async fn rejected_saves_leave_the_tables_alone() {
    let harness = Harness::new();
    let app = harness.app().await;
    save(&app, &full_state()).await;

    post_json(&app, r#"{"type":"delete"}"#).await;
    post_json(&app, r#"{"type":"save"}"#).await;

    assert_eq!(as_state(load(&app).await), as_state(full_state()));
}

#[rstest]
#[actix_web::test]
async fn unreachable_store_is_service_unavailable() {
    let harness = Harness::new();
    let app = harness.app().await;
    harness.store.set_available(false);

    let (status, value) = post_json(&app, r#"{"type":"load"}"#).await;

    assert_eq!(status, 503);
    assert_eq!(value["code"], "store_unavailable");
}

#[rstest]
#[actix_web::test]
async fn empty_post_is_an_empty_success() {
    let harness = Harness::new();
    let app = harness.app().await;
    harness.store.set_available(false);

    let req = test::TestRequest::post().uri("/").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));
    assert!(test::read_body(res).await.is_empty());
}

#[rstest]
#[actix_web::test]
async fn get_reports_the_service_is_running() {
    let harness = Harness::new();
    let app = harness.app().await;

    let req = test::TestRequest::get().uri("/").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body.as_ref(), RUNNING_MESSAGE.as_bytes());
}
