use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use branch_cell::router::branch_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseRows, TestUser};

fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn test_app(config: &AppConfig) -> Router {
    branch_routes(Arc::new(config.clone()))
}

#[tokio::test]
async fn test_create_branch_as_admin() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::admin("owner@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/branches"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseRows::branch_row(&user.id, "22222222-2222-2222-2222-222222222222")
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Downtown Salon",
                "address": "12 Main Street",
                "phone": "+353-1-555-0100",
                "opening_time": "9:00 AM",
                "closing_time": "9:00 PM"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_branch_rejected_for_receptionist() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::receptionist("front@example.com", "owner-1", "branch-1");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "name": "Rogue Branch" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_branch_requires_name() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::admin("owner@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "name": "  " }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_receptionist_can_read_own_branch() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let branch_id = "22222222-2222-2222-2222-222222222222";
    let user = TestUser::receptionist("front@example.com", "owner-1", branch_id);
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/branches"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockSupabaseRows::branch_row("owner-1", branch_id)])),
        )
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/{}", branch_id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_receptionist_cannot_read_other_branch() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::receptionist("front@example.com", "owner-1", "branch-1");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("GET")
        .uri("/branch-2")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
