use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseRows, TestConfig, TestUser};

const OWNER: &str = "11111111-1111-1111-1111-111111111111";
const BRANCH: &str = "22222222-2222-2222-2222-222222222222";

fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn test_app(config: &AppConfig) -> Router {
    appointment_routes(Arc::new(config.clone()))
}

async fn mount_branch(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/branches"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockSupabaseRows::branch_row(OWNER, BRANCH)])),
        )
        .mount(mock_server)
        .await;
}

fn booking_body(staff: &str, time: &str) -> Value {
    json!({
        "customer_name": "Jamie Doe",
        "email": "jamie@example.com",
        "phone": "+353-86-555-0101",
        "category": "Hair",
        "service": "Haircut",
        "staff": staff,
        "date": "2025-01-06",
        "time": time,
        "notes": null,
        "branch_id": BRANCH,
        "price": 45.0
    })
}

#[tokio::test]
async fn test_book_appointment_success() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    mount_branch(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::service_row(OWNER, "Haircut", "45 min", 45.0)
        ])))
        .mount(&mock_server)
        .await;

    // Monday stylist with free schedule.
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::staff_row(OWNER, BRANCH, "Alex")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::appointment_row(OWNER, BRANCH, "Alex", "2025-01-06", "10:00 AM", "Pending")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(booking_body("Alex", "10:00 AM").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_rejected_on_overlap() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    mount_branch(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::service_row(OWNER, "Haircut", "45 min", 45.0)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::staff_row(OWNER, BRANCH, "Alex")
        ])))
        .mount(&mock_server)
        .await;

    // Confirmed 10:00 AM booking for the same stylist; a 10:20 AM request
    // with a 45-minute service overlaps it.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment_row(OWNER, BRANCH, "Alex", "2025-01-06", "10:00 AM", "Confirmed")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(booking_body("Alex", "10:20 AM").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_excludes_cancelled_appointments_from_conflict_query() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    mount_branch(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::service_row(OWNER, "Haircut", "45 min", 45.0)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::staff_row(OWNER, BRANCH, "Alex")
        ])))
        .mount(&mock_server)
        .await;

    // The conflict fetch must carve cancelled and rejected rows out at the
    // query level; a cancelled booking at the same time does not block.
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("status", "not.in.(Cancelled,Rejected)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::appointment_row(OWNER, BRANCH, "Alex", "2025-01-06", "10:00 AM", "Pending")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(booking_body("Alex", "10:00 AM").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_rejected_on_day_off() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    mount_branch(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::service_row(OWNER, "Haircut", "45 min", 45.0)
        ])))
        .mount(&mock_server)
        .await;

    // Weekend-only stylist; 2025-01-06 is a Monday.
    let mut staff = MockSupabaseRows::staff_row(OWNER, BRANCH, "Alex");
    staff["working_days"] = json!(["Sat", "Sun"]);
    Mock::given(method("GET"))
        .and(path("/rest/v1/staff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([staff])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(booking_body("Alex", "10:00 AM").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payload: Value = serde_json::from_slice(&body).unwrap();
    let message = payload["error"].as_str().unwrap();
    assert!(message.contains("Mon"), "message should name the weekday: {message}");
}

#[tokio::test]
async fn test_any_staff_skips_staff_checks() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    mount_branch(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::service_row(OWNER, "Haircut", "45 min", 45.0)
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::appointment_row(OWNER, BRANCH, "Any", "2025-01-06", "10:00 AM", "Pending")
        ])))
        .mount(&mock_server)
        .await;

    // No staff or appointment mocks mounted: "Any" must not touch them.
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(booking_body("Any", "10:00 AM").to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_available_slots_grid() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let mut branch = MockSupabaseRows::branch_row(OWNER, BRANCH);
    branch["opening_time"] = json!("9:00 AM");
    branch["closing_time"] = json!("11:00 AM");
    Mock::given(method("GET"))
        .and(path("/rest/v1/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([branch])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseRows::appointment_row(OWNER, BRANCH, "Alex", "2025-01-06", "9:30 AM", "Confirmed")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!(
            "/available-slots?branch_id={}&date=2025-01-06",
            BRANCH
        ))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let slots: Value = serde_json::from_slice(&body).unwrap();
    let slots = slots.as_array().unwrap();

    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0]["time"], "9:00 AM");
    assert_eq!(slots[0]["available"], true);
    assert_eq!(slots[1]["time"], "9:30 AM");
    assert_eq!(slots[1]["available"], false);
    assert_eq!(slots[3]["time"], "10:30 AM");
}

#[tokio::test]
async fn test_list_appointments_requires_auth() {
    let config = TestConfig::default().to_app_config();
    let app = test_app(&config);

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_receptionist_cannot_list_other_branch() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::receptionist("front@example.com", OWNER, BRANCH);
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("GET")
        .uri("/?branch_id=33333333-3333-3333-3333-333333333333")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_status() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::admin("owner@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let appointment =
        MockSupabaseRows::appointment_row(&user.id, BRANCH, "Alex", "2025-01-06", "10:00 AM", "Pending");
    let appointment_id = appointment["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([appointment.clone()])))
        .mount(&mock_server)
        .await;

    let mut confirmed = appointment.clone();
    confirmed["status"] = json!("Confirmed");
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([confirmed])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("PATCH")
        .uri(&format!("/{}/status", appointment_id))
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "Confirmed" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let payload: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["appointment"]["status"], "Confirmed");
}
