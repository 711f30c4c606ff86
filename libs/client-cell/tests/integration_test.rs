use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

use client_cell::router::client_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, TestUser};

fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn test_app(config: &AppConfig) -> Router {
    client_routes(Arc::new(config.clone()))
}

fn client_row(owner_id: &str) -> serde_json::Value {
    json!({
        "id": uuid::Uuid::new_v4(),
        "owner_id": owner_id,
        "name": "Jamie Doe",
        "email": "jamie@example.com",
        "phone": "+353-86-555-0101",
        "notes": null,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn test_create_client() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::receptionist("front@example.com", "owner-1", "branch-1");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/clients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([client_row("owner-1")])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "name": "Jamie Doe",
                "email": "jamie@example.com",
                "phone": "+353-86-555-0101"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_phone_returns_friendly_400() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::admin("owner@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("POST"))
        .and(path("/rest/v1/clients"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"clients_owner_phone_key\""
        })))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Jamie Doe", "phone": "+353-86-555-0101" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("phone number"));
}

#[tokio::test]
async fn test_search_clients() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::admin("owner@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .and(query_param_contains("or", "name.ilike"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([client_row(&user.id)])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/?search=Jamie")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_delete_client_requires_admin() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::receptionist("front@example.com", "owner-1", "branch-1");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("DELETE")
        .uri("/client-1")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
