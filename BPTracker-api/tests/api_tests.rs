use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bp_tracker_api::api::create_router;
use bp_tracker_api::api::handlers::readings::ReadingService;
use bp_tracker_data::repository::ReadingRepository;
use bp_tracker_domain::health::HealthServiceTrait;
use bp_tracker_domain::services::readings::ReadingService as DomainReadingService;
use bp_tracker_domain::testing::{MockHealthService, MockReadingService};

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response body is UTF-8")
    }
}

fn app_with(service: ReadingService) -> Router {
    let health: Arc<dyn HealthServiceTrait + Send + Sync> = Arc::new(MockHealthService::new());
    create_router(service, health, true)
}

fn test_app() -> Router {
    app_with(Arc::new(DomainReadingService::new(ReadingRepository::in_memory())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<(&str, String)>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some((content_type, body)) => builder
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

    TestResponse { status, headers, body }
}

async fn post_json(app: &Router, uri: &str, value: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(("application/json", value.to_string()))).await
}

async fn create(app: &Router, date: &str, time: &str, systolic: u16, diastolic: u16, pulse: u16) -> Value {
    let response = post_json(
        app,
        "/api/v1/readings",
        json!({"date": date, "time": time, "systolic": systolic, "diastolic": diastolic, "pulse": pulse}),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn test_create_list_aggregate_delete_round_trip() {
    let app = test_app();

    let first = create(&app, "2026-01-21", "08:00", 120, 80, 70).await;
    create(&app, "2026-01-21", "09:30", 130, 90, 80).await;
    create(&app, "2026-01-20", "19:15", 118, 76, 64).await;

    assert_eq!(first["bp_color"], "orange");
    assert_eq!(first["pulse_color"], "dark-green");
    assert_eq!(first["time"], "08:00");

    let list = send(&app, Method::GET, "/api/v1/readings", None).await;
    assert_eq!(list.status, StatusCode::OK);
    let times: Vec<String> = list.json().as_array().unwrap().iter().map(|r| r["time"].as_str().unwrap().to_string()).collect();
    assert_eq!(times, vec!["09:30", "08:00", "19:15"]);

    let asc = send(&app, Method::GET, "/api/v1/readings?sort=asc", None).await;
    assert_eq!(asc.json()[0]["time"], "08:00");

    let aggregated = send(&app, Method::GET, "/api/v1/readings/aggregated", None).await;
    assert_eq!(aggregated.status, StatusCode::OK);
    let groups = aggregated.json();
    assert_eq!(groups.as_array().unwrap().len(), 2);
    assert_eq!(groups[0]["date"], "2026-01-21");
    assert_eq!(groups[0]["bucket"], "Midnight - 10 AM");
    assert_eq!(groups[0]["avg_systolic"], 125.0);
    assert_eq!(groups[0]["avg_diastolic"], 85.0);
    assert_eq!(groups[0]["avg_pulse"], 75.0);
    assert_eq!(groups[0]["bp_color"], "orange");
    assert_eq!(groups[0]["pulse_color"], "green");
    assert_eq!(groups[1]["bucket"], "2 PM - Midnight");

    let id = first["id"].as_str().unwrap();
    let fetched = send(&app, Method::GET, &format!("/api/v1/readings/{}", id), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["systolic"], 120);

    let deleted = send(&app, Method::DELETE, &format!("/api/v1/readings/{}", id), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = send(&app, Method::GET, &format!("/api/v1/readings/{}", id), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["error"], "not_found");

    let cleared = send(&app, Method::DELETE, "/api/v1/readings", None).await;
    assert_eq!(cleared.json()["count"], 2);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = test_app();

    let missing_pulse = post_json(
        &app,
        "/api/v1/readings",
        json!({"date": "2026-01-21", "time": "08:00", "systolic": 120, "diastolic": 80}),
    )
    .await;
    assert_eq!(missing_pulse.status, StatusCode::BAD_REQUEST);
    let body = missing_pulse.json();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Please fill in all fields with valid numbers");

    let not_a_number = post_json(
        &app,
        "/api/v1/readings",
        json!({"date": "2026-01-21", "time": "08:00", "systolic": "abc", "diastolic": 80, "pulse": 70}),
    )
    .await;
    assert_eq!(not_a_number.status, StatusCode::BAD_REQUEST);

    let zero_pulse = post_json(
        &app,
        "/api/v1/readings",
        json!({"date": "2026-01-21", "time": "08:00", "systolic": 120, "diastolic": 80, "pulse": 0}),
    )
    .await;
    assert_eq!(zero_pulse.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero_pulse.json()["error"], "validation_error");

    let list = send(&app, Method::GET, "/api/v1/readings", None).await;
    assert_eq!(list.json(), json!([]));
}

#[tokio::test]
async fn test_invalid_sort_order() {
    let app = test_app();
    let response = send(&app, Method::GET, "/api/v1/readings?sort=sideways", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "bad_request");
}

#[tokio::test]
async fn test_statistics_require_readings() {
    let app = test_app();

    let empty = send(&app, Method::GET, "/api/v1/readings/statistics", None).await;
    assert_eq!(empty.status, StatusCode::NOT_FOUND);
    assert_eq!(empty.json()["error"], "insufficient_data");

    create(&app, "2026-01-21", "08:00", 110, 70, 60).await;
    create(&app, "2026-01-21", "20:00", 150, 95, 90).await;

    let stats = send(&app, Method::GET, "/api/v1/readings/statistics", None).await;
    assert_eq!(stats.status, StatusCode::OK);
    let body = stats.json();
    assert_eq!(body["total_readings"], 2);
    assert_eq!(body["max_systolic"], 150);
    assert_eq!(body["category"], "Hypertension1");
    assert_eq!(body["color"], "orange");
}

#[tokio::test]
async fn test_sort_persists_stored_order() {
    let app = test_app();
    create(&app, "2026-01-20", "09:00", 121, 79, 70).await;
    create(&app, "2026-01-21", "20:00", 132, 84, 74).await;
    create(&app, "2026-01-21", "07:30", 118, 76, 64).await;

    let sorted = send(&app, Method::POST, "/api/v1/readings/sort", None).await;
    assert_eq!(sorted.status, StatusCode::OK);
    assert_eq!(sorted.json()[0]["time"], "07:30");

    let exported = send(&app, Method::GET, "/api/v1/readings/export/json", None).await;
    let document = exported.json();
    assert_eq!(document[0]["time"], "07:30");
    assert_eq!(document[2]["date"], "2026-01-20");
}

#[tokio::test]
async fn test_text_export_and_import() {
    let app = test_app();
    create(&app, "2026-01-21", "08:15", 120, 80, 70).await;
    create(&app, "2026-01-21", "19:40", 131, 85, 75).await;

    let exported = send(&app, Method::GET, "/api/v1/readings/export/text", None).await;
    assert_eq!(exported.status, StatusCode::OK);
    let disposition = exported.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("bp-readings-"));
    assert!(disposition.ends_with(".txt\""));

    let text = exported.text();
    assert!(text.starts_with("Blood Pressure & Pulse Readings\n"));
    assert!(text.contains("Average Systolic: 125.5"));

    let fresh = test_app();
    let imported = send(&fresh, Method::POST, "/api/v1/readings/import/text", Some(("text/plain", text))).await;
    assert_eq!(imported.status, StatusCode::OK);
    assert_eq!(imported.json()["imported"], 2);

    let list = send(&fresh, Method::GET, "/api/v1/readings", None).await;
    assert_eq!(list.json()[0]["systolic"], 131);

    let nothing = send(&fresh, Method::POST, "/api/v1/readings/import/text", Some(("text/plain", "hello".to_string()))).await;
    assert_eq!(nothing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_json_import_replaces_collection() {
    let app = test_app();
    create(&app, "2026-01-21", "08:15", 120, 80, 70).await;

    let document = json!([
        {"id": 1, "date": "2026-01-18", "time": "06:00", "systolic": 117, "diastolic": 75, "pulse": 58},
        {"id": 2, "date": "2026-01-18", "time": "21:00", "systolic": 128, "diastolic": 79, "pulse": 66}
    ]);
    let loaded = post_json(&app, "/api/v1/readings/import/json", document).await;
    assert_eq!(loaded.status, StatusCode::OK);
    assert_eq!(loaded.json()["imported"], 2);

    let fetched = send(&app, Method::GET, "/api/v1/readings/2", None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["pulse_color"], "blue");

    let broken = send(&app, Method::POST, "/api/v1/readings/import/json", Some(("application/json", "[{".to_string()))).await;
    assert_eq!(broken.status, StatusCode::BAD_REQUEST);
    assert_eq!(broken.json()["error"], "bad_request");

    let out_of_range = post_json(
        &app,
        "/api/v1/readings/import/json",
        json!([{"id": "x", "date": "2026-01-18", "time": "06:00", "systolic": 0, "diastolic": 0, "pulse": 0}]),
    )
    .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
    assert_eq!(out_of_range.json()["error"], "validation_error");
    assert_eq!(send(&app, Method::GET, "/api/v1/readings", None).await.json().as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_storage_failure_returns_internal_error() {
    let app = app_with(Arc::new(MockReadingService::new().with_repository_failure()));

    let response = send(&app, Method::GET, "/api/v1/readings/aggregated", None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "internal_error");
}

#[tokio::test]
async fn test_mock_validation_failure() {
    let app = app_with(Arc::new(MockReadingService::new().with_validation_failure()));

    let response = post_json(
        &app,
        "/api/v1/readings",
        json!({"date": "2026-01-21", "time": "08:00", "systolic": 120, "diastolic": 80, "pulse": 70}),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "validation_error");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = test_app();

    let health = send(&app, Method::GET, "/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "ok");

    let openapi = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(openapi.status, StatusCode::OK);
    assert!(openapi.json()["paths"]["/api/v1/readings/aggregated"].is_object());
}
