mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::state_with;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use tripsheet::http::router;
use tripsheet::store::HmValidationSet;
use tripsheet::store::fake::FakeStore;

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router) -> String {
    let (_, body) = call(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "dsp01", "password": "s3cret"})),
    )
    .await;
    body["token"].as_str().expect("token").to_string()
}

fn validation_row() -> Value {
    json!({
        "id": "1201",
        "next_id": "1202",
        "prev_id": "1195",
        "mobileid": "DT1101",
        "opr_nrp": "88123",
        "opr_username": "A. SIREGAR",
        "opr_shift": "1",
        "lgn_pattern": "IN-OUT",
        "prev_hm": 10448.0,
        "hm": 10450.5,
        "next_hm": 10461.0,
        "reporttime": "2024-03-02T06:10:00",
        "next_reporttime": "2024-03-02T18:40:00",
        "problem": "",
    })
}

#[tokio::test]
async fn step3_serves_the_validation_set_as_is() {
    let store = Arc::new(FakeStore::new());
    *store.validation_set.lock().unwrap() = HmValidationSet {
        columns: vec!["id".to_string(), "hm".to_string(), "problem".to_string()],
        rows: vec![validation_row()],
    };
    let app = router(state_with(store));
    let token = login(&app).await;

    let (status, body) = call(&app, "GET", "/api/timesheet/step3", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"], json!(["id", "hm", "problem"]));
    assert_eq!(body["rows"][0]["opr_nrp"], "88123");
}

#[tokio::test]
async fn historical_login_requires_a_mobileid() {
    let store = Arc::new(FakeStore::new());
    *store.history.lock().unwrap() = vec![json!({"id": "9", "mobileid": "DT1101"})];
    let app = router(state_with(store));
    let token = login(&app).await;

    let (status, _) = call(
        &app,
        "GET",
        "/api/timesheet/historical-login",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "GET",
        "/api/timesheet/historical-login?mobileid=DT1101",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows"][0]["mobileid"], "DT1101");
}

#[tokio::test]
async fn next_and_prev_updates_target_the_neighbor_record() {
    let store = Arc::new(FakeStore::new());
    let app = router(state_with(store.clone()));
    let token = login(&app).await;

    let mut body = validation_row();
    body["new_hm"] = json!(10462.0);
    let (status, _) = call(
        &app,
        "POST",
        "/api/timesheet/update-next-hm",
        Some(&token),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        "POST",
        "/api/timesheet/update-prev-hm",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let corrections = store.corrections.lock().unwrap();
    assert_eq!(corrections[0].target_id, "1202");
    assert_eq!(corrections[0].remark, "next_hm_update");
    assert_eq!(corrections[0].before_hm, Some(10461.0));
    assert_eq!(corrections[1].target_id, "1195");
    assert_eq!(corrections[1].remark, "prev_hm_update");
    assert_eq!(corrections[1].before_hm, Some(10448.0));
}

#[tokio::test]
async fn validate_data_marks_the_current_record() {
    let store = Arc::new(FakeStore::new());
    let app = router(state_with(store.clone()));
    let token = login(&app).await;

    let mut body = validation_row();
    body["new_hm"] = json!(10450.5);
    let (status, _) = call(
        &app,
        "POST",
        "/api/timesheet/validate-data",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let corrections = store.corrections.lock().unwrap();
    assert_eq!(corrections[0].target_id, "1201");
    assert_eq!(corrections[0].remark, "valid");
}

#[tokio::test]
async fn update_shift_submits_the_adjacent_pair() {
    let store = Arc::new(FakeStore::new());
    let app = router(state_with(store.clone()));
    let token = login(&app).await;

    let mut body = validation_row();
    body["new_shift"] = json!("2");
    let (status, _) = call(
        &app,
        "POST",
        "/api/timesheet/update-shift",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let changes = store.shift_changes.lock().unwrap();
    assert_eq!(changes[0].id, "1201");
    assert_eq!(changes[0].next_id.as_deref(), Some("1202"));
    assert_eq!(changes[0].opr_shift.as_deref(), Some("1"));
}

#[tokio::test]
async fn update_shift_rejects_a_retrieval_code_as_value() {
    let store = Arc::new(FakeStore::new());
    let app = router(state_with(store.clone()));
    let token = login(&app).await;

    let mut body = validation_row();
    body["new_shift"] = json!("S01");
    let (status, payload) = call(
        &app,
        "POST",
        "/api/timesheet/update-shift",
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["success"], false);
    assert!(store.call_log().is_empty());
}
